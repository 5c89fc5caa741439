pub mod delegate_detail;

pub use delegate_detail::{DelegateDetail, DelegateDetailService, DelegateView};
