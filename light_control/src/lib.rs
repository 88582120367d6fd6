#![no_std]
extern crate alloc;

pub mod bsp;
pub mod control;
pub mod edt;
