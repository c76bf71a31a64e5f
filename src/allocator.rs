//! Global allocator.
//!
//! Splitting allocates one passphrase, one Argon2 block matrix and several
//! ciphertext buffers per group, from many rayon workers at once. mimalloc
//! keeps per-thread heaps, so those workers do not contend on a global lock.

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;
