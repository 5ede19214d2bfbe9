pub mod payment;
pub mod proof;
pub mod response;

pub use payment::*;
pub use proof::*;
pub use response::*;
