//! End-to-end embedding and recovery.
//!
//! ```text
//! secret -> split -> plan grid -> crop blocks -> embed shares -> merge -> stego image
//!                                     columns -> RSA-OAEP -> encrypted geometry
//! ```

mod artifacts;
mod pipeline;

pub use artifacts::{load_carrier, StegoArtifacts};
pub use pipeline::{plan, EmbedOutput, StegoPipeline};
