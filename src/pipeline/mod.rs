//! Pipeline stages for upload-to-PNG conversion.
//!
//! Each submodule implements exactly one step, so each can be tested against
//! a temp directory on its own.
//!
//! ## Data Flow
//!
//! ```text
//! stage ──▶ decode ──▶ encode
//! (bytes     (sniff +    (PNG, temp
//!  to disk)   decode)     + rename)
//! ```
//!
//! 1. [`stage`]  — write the uploaded bytes under their original name; the
//!    returned guard removes the file on drop
//! 2. [`decode`] — detect the format from content and decode it
//! 3. [`encode`] — make the pixels PNG-compatible and atomically replace the
//!    output file

pub mod decode;
pub mod encode;
pub mod stage;
