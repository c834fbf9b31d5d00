#![allow(non_snake_case)]
#[allow(non_snake_case)]
pub mod Composition;
#[allow(non_snake_case)]
pub mod Report;
#[allow(non_snake_case)]
pub mod Utils;
pub mod cli;
pub mod settings;
