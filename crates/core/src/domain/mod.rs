pub mod dimension;
pub mod material;
pub mod product;
pub mod quote;
pub mod slots;
