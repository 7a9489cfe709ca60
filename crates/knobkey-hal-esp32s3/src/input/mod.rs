pub mod button;
pub mod rotary;
