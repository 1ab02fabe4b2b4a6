// src/gadgets/mod.rs

pub mod inner_product;
pub mod mimc;

pub use inner_product::inner_product_gadget;
pub use mimc::mimc3_gadget;
