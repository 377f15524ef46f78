//! Share codec: writing shares into block pixels and reading them back.
//!
//! Every block carries one share in the HSV value channel of its first
//! pixels (raster order):
//!
//! ```text
//! pixel 0      -> number of payload digits L
//! pixel 1      -> share index
//! pixel 2..2+L -> decimal digits of the payload as a big-endian integer
//! ```

mod codec;
pub mod value;

pub use codec::{
    check_share, collect_shares, embed_all, embed_share, extract_all, extract_share,
    payload_digits,
};
