mod requests;
mod responses;
mod session;

pub use requests::*;
pub use responses::*;
pub use session::*;
