pub mod controller;
mod views;
