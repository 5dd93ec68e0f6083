pub mod currency;
pub mod paging;
