//! File-level split, merge and inspect.
//!
//! The engine works on byte buffers; this module reads the input, turns
//! shares into artifacts and writes them out. Group generation and merging
//! are CPU bound and run on the blocking pool so the runtime stays free.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::fs;
use tracing::{debug, info, warn};

use crate::artifact::{Artifact, Parameters};
use crate::cipher::{KdfParams, PassphraseCipher};
use crate::compression::Compression;
use crate::config::{MAX_GROUP_COUNT, MAX_SHARE_COUNT};
use crate::engine::{MergeEngine, Scheduler, binomial, distribute};
use crate::error::SplitError;
use crate::types::{Operation, Share, ShareIndex, ShareInfo, ShareStatus, SplitParams};
use crate::ui::progress::Bar;

/// Settings for [`split_file`].
#[derive(Debug, Clone)]
pub struct SplitOptions {
    pub share_count: usize,
    pub threshold: usize,
    pub kdf: KdfParams,
    pub compression: Compression,
    /// Directory for the shares; next to the input when `None`.
    pub output_dir: Option<PathBuf>,
    pub show_progress: bool,
}

impl SplitOptions {
    /// Default cipher costs with zstd, shares written next to the input.
    #[must_use]
    pub fn new(share_count: usize, threshold: usize) -> Self {
        Self { share_count, threshold, kdf: KdfParams::default(), compression: Compression::default(), output_dir: None, show_progress: false }
    }
}

/// Files written by a split.
#[derive(Debug)]
pub struct SplitOutcome {
    pub paths: Vec<PathBuf>,
    pub groups: u64,
}

/// Result of a merge.
#[derive(Debug)]
pub struct MergeOutcome {
    /// Size of the rebuilt file.
    pub bytes: u64,
    /// Distinct shares that took part.
    pub shares: usize,
}

/// Path of share `index` of `input`: `<file>.<index>`.
#[must_use]
pub fn share_path(input: &Path, output_dir: Option<&Path>, index: ShareIndex) -> PathBuf {
    let mut name: OsString = input.file_name().map_or_else(|| input.as_os_str().to_os_string(), ToOwned::to_owned);
    name.push(format!(".{index}"));

    match output_dir {
        Some(dir) => dir.join(name),
        None => input.with_file_name(name),
    }
}

/// Validates `n` and `r` against the command line ceilings.
///
/// Returns the number of groups the split will generate.
///
/// # Errors
///
/// Fails with [`SplitError::InvalidParameters`] if the pair is invalid, `n`
/// exceeds [`MAX_SHARE_COUNT`] or `C(n, r)` exceeds [`MAX_GROUP_COUNT`].
pub fn check_limits(share_count: usize, threshold: usize) -> Result<(SplitParams, u64), SplitError> {
    let params = SplitParams::new(share_count, threshold)?;

    if share_count > MAX_SHARE_COUNT {
        return Err(SplitError::invalid(format!("share count {share_count} exceeds the limit of {MAX_SHARE_COUNT}")));
    }

    let groups = binomial(share_count, threshold).filter(|&groups| groups <= MAX_GROUP_COUNT).ok_or_else(|| {
        SplitError::invalid(format!("{share_count} shares with {threshold} required would generate more than {MAX_GROUP_COUNT} groups"))
    })?;

    Ok((params, groups))
}

/// Splits `input` into shares and writes them.
///
/// Nothing is written unless every group was generated. If a write fails,
/// shares already written are removed.
///
/// # Errors
///
/// Fails on invalid parameters, I/O errors and engine errors.
pub async fn split_file(input: &Path, options: &SplitOptions) -> Result<SplitOutcome> {
    let (params, groups) = check_limits(options.share_count, options.threshold)?;
    let cipher = PassphraseCipher::new(options.kdf)?;

    let data = fs::read(input).await.with_context(|| format!("failed to read file: {}", input.display()))?;
    info!(path = %input.display(), bytes = data.len(), shares = params.share_count(), required = params.threshold(), "splitting file");

    let compression = options.compression;
    let show_progress = options.show_progress;
    let shares = tokio::task::spawn_blocking(move || -> Result<Vec<Share>> {
        let payload = compression.compress(&data)?;
        debug!(compression = %compression, before = data.len(), after = payload.len(), "compressed payload");

        let bar = if show_progress { Bar::new(groups, Operation::Split.label())? } else { Bar::hidden(groups) };
        let assignments = Scheduler::new(&cipher, params).with_progress(&bar).schedule(&payload, &mut StdRng::from_os_rng())?;
        bar.finish();

        Ok(distribute(params, assignments))
    })
    .await
    .context("group generation task failed")??;

    let mut encoded = Vec::with_capacity(shares.len());
    for (index, share) in shares.into_iter().enumerate() {
        let index = index as ShareIndex;
        let artifact = Artifact::new(Parameters::new(params, options.kdf, compression, index), share);
        encoded.push((share_path(input, options.output_dir.as_deref(), index), artifact.encode()?));
    }

    if let Some(dir) = &options.output_dir {
        fs::create_dir_all(dir).await.with_context(|| format!("failed to create directory: {}", dir.display()))?;
    }

    let paths = write_all_or_nothing(encoded).await?;
    info!(shares = paths.len(), groups, "split complete");

    Ok(SplitOutcome { paths, groups })
}

async fn write_all_or_nothing(files: Vec<(PathBuf, Vec<u8>)>) -> Result<Vec<PathBuf>> {
    let mut written: Vec<PathBuf> = Vec::with_capacity(files.len());

    for (path, bytes) in files {
        if let Err(e) = fs::write(&path, &bytes).await {
            for done in &written {
                if let Err(cleanup) = fs::remove_file(done).await {
                    warn!(path = %done.display(), error = %cleanup, "failed to remove partial share");
                }
            }
            return Err(e).with_context(|| format!("failed to write share: {}", path.display()));
        }

        debug!(path = %path.display(), bytes = bytes.len(), "wrote share");
        written.push(path);
    }

    Ok(written)
}

/// Decoded artifacts ready for merging.
#[derive(Debug)]
pub struct ShareSet {
    pub parameters: Parameters,
    pub shares: Vec<Share>,
}

/// Checks that decoded artifacts belong to one split and drops repeated
/// share indices.
///
/// Malformed entries are logged and skipped. When nothing decodes, the
/// first decoding error is returned.
///
/// # Errors
///
/// Returns [`SplitError::MalformedArtifact`] if no entry decodes and
/// [`SplitError::InconsistentArtifacts`] if two artifacts disagree.
pub fn collect_shares(decoded: Vec<(PathBuf, Result<Artifact, SplitError>)>) -> Result<ShareSet, SplitError> {
    let mut first_error = None;
    let mut artifacts = Vec::with_capacity(decoded.len());

    for (position, (path, result)) in decoded.into_iter().enumerate() {
        match result {
            Ok(artifact) => artifacts.push((position + 1, path, artifact)),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping malformed share");
                first_error.get_or_insert(e);
            }
        }
    }

    let Some((_, _, first)) = artifacts.first() else {
        return Err(first_error.unwrap_or(SplitError::InsufficientShares { found: 0, required: 1 }));
    };
    let parameters = first.parameters;
    let required = first.share.required_pieces;

    let mut seen: Vec<ShareIndex> = Vec::with_capacity(artifacts.len());
    let mut shares = Vec::with_capacity(artifacts.len());

    for (share, path, artifact) in artifacts {
        if let Some(reason) = parameters.mismatch(&artifact.parameters) {
            return Err(SplitError::InconsistentArtifacts { share, reason });
        }

        if artifact.share.required_pieces != required {
            let reason = format!("requires {} pieces, expected {required}", artifact.share.required_pieces);
            return Err(SplitError::InconsistentArtifacts { share, reason });
        }

        let index = artifact.parameters.share_index;
        if seen.contains(&index) {
            warn!(path = %path.display(), share = index, "share supplied twice, ignoring duplicate");
            continue;
        }

        seen.push(index);
        shares.push(artifact.share);
    }

    Ok(ShareSet { parameters, shares })
}

/// Rebuilds the original file from share files and writes it to `output`.
///
/// # Errors
///
/// Fails on I/O errors and every merge error of the engine.
pub async fn merge_files(inputs: &[PathBuf], output: &Path, verify: bool) -> Result<MergeOutcome> {
    if inputs.is_empty() {
        return Err(SplitError::InsufficientShares { found: 0, required: 1 }.into());
    }

    let mut decoded = Vec::with_capacity(inputs.len());
    for path in inputs {
        let bytes = fs::read(path).await.with_context(|| format!("failed to read share: {}", path.display()))?;
        decoded.push((path.clone(), Artifact::decode(&bytes)));
    }

    let ShareSet { parameters, shares } = collect_shares(decoded)?;
    let cipher = PassphraseCipher::new(parameters.kdf_params())?;
    let compression = parameters.compression();
    let count = shares.len();
    info!(shares = count, "merging shares");

    let data = tokio::task::spawn_blocking(move || -> Result<Vec<u8>> {
        let merged = MergeEngine::new(&cipher).verify_all(verify).merge(&shares)?;
        debug!(group = merged.group, complete = merged.complete_groups, "decrypted group");
        compression.decompress(&merged.data)
    })
    .await
    .context("merge task failed")??;

    fs::write(output, &data).await.with_context(|| format!("failed to write file: {}", output.display()))?;
    info!(path = %output.display(), bytes = data.len(), "merge complete");

    Ok(MergeOutcome { bytes: data.len() as u64, shares: count })
}

/// Decodes each file and summarizes it. Malformed files are reported,
/// not rejected.
///
/// # Errors
///
/// Fails only if a file cannot be read.
pub async fn inspect_files(inputs: &[PathBuf]) -> Result<Vec<ShareInfo>> {
    let mut infos = Vec::with_capacity(inputs.len());

    for path in inputs {
        let bytes = fs::read(path).await.with_context(|| format!("failed to read share: {}", path.display()))?;
        let status = match Artifact::decode(&bytes) {
            Ok(artifact) => ShareStatus::Valid {
                parameters: artifact.parameters,
                required_pieces: artifact.share.required_pieces,
                chunks: artifact.share.chunks.len(),
                groups: artifact.share.groups().len(),
            },
            Err(e) => ShareStatus::Malformed(e.to_string()),
        };

        infos.push(ShareInfo { path: path.clone(), size: bytes.len() as u64, status });
    }

    Ok(infos)
}

/// Default merge output: the first share's path without its index suffix.
///
/// # Errors
///
/// Fails if no inputs are given or the first one carries no `.<index>`
/// suffix.
pub fn default_output(inputs: &[PathBuf]) -> Result<PathBuf> {
    let Some(first) = inputs.first() else {
        bail!("no shares given");
    };

    match (first.extension(), first.file_stem()) {
        (Some(ext), Some(stem)) if ext.to_string_lossy().parse::<ShareIndex>().is_ok() => Ok(first.with_file_name(stem)),
        _ => bail!("cannot derive output name from {}, pass --output", first.display()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact(index: ShareIndex, count: usize) -> Artifact {
        let params = SplitParams::new(count, 2).unwrap();
        let parameters = Parameters::new(params, KdfParams::new(8, 1, 1), Compression::None, index);
        Artifact::new(parameters, Share { required_pieces: 2, chunks: Vec::new() })
    }

    #[test]
    fn test_share_path() {
        assert_eq!(share_path(Path::new("/data/report.pdf"), None, 0), PathBuf::from("/data/report.pdf.0"));
        assert_eq!(share_path(Path::new("notes"), None, 3), PathBuf::from("notes.3"));
        assert_eq!(share_path(Path::new("/data/report.pdf"), Some(Path::new("/out")), 12), PathBuf::from("/out/report.pdf.12"));
    }

    #[test]
    fn test_default_output() {
        assert_eq!(default_output(&[PathBuf::from("/data/report.pdf.2")]).unwrap(), PathBuf::from("/data/report.pdf"));
        assert!(default_output(&[PathBuf::from("/data/report.pdf")]).is_err());
        assert!(default_output(&[]).is_err());
    }

    #[test]
    fn test_check_limits() {
        assert_eq!(check_limits(5, 3).unwrap().1, 10);
        assert!(matches!(check_limits(33, 1), Err(SplitError::InvalidParameters { .. })));
        assert!(matches!(check_limits(20, 10), Err(SplitError::InvalidParameters { .. })));
        assert!(matches!(check_limits(3, 4), Err(SplitError::InvalidParameters { .. })));
    }

    #[test]
    fn test_collect_drops_duplicates() {
        let decoded = vec![(PathBuf::from("a.0"), Ok(artifact(0, 3))), (PathBuf::from("b.0"), Ok(artifact(0, 3))), (PathBuf::from("a.1"), Ok(artifact(1, 3)))];
        let set = collect_shares(decoded).unwrap();
        assert_eq!(set.shares.len(), 2);
    }

    #[test]
    fn test_collect_skips_malformed() {
        let decoded = vec![(PathBuf::from("bad"), Err(SplitError::malformed("invalid magic bytes"))), (PathBuf::from("a.1"), Ok(artifact(1, 3)))];
        let set = collect_shares(decoded).unwrap();
        assert_eq!(set.shares.len(), 1);
        assert_eq!(set.parameters.share_index, 1);
    }

    #[test]
    fn test_collect_all_malformed_returns_first_error() {
        let decoded = vec![(PathBuf::from("x"), Err(SplitError::malformed("first"))), (PathBuf::from("y"), Err(SplitError::malformed("second")))];
        let err = collect_shares(decoded).unwrap_err();
        assert!(matches!(err, SplitError::MalformedArtifact { ref reason } if reason == "first"));
    }

    #[test]
    fn test_collect_rejects_mixed_splits() {
        let decoded = vec![(PathBuf::from("a.0"), Ok(artifact(0, 3))), (PathBuf::from("b.1"), Ok(artifact(1, 4)))];
        let err = collect_shares(decoded).unwrap_err();
        assert!(matches!(err, SplitError::InconsistentArtifacts { share: 2, .. }));
    }

    #[test]
    fn test_collect_reports_input_position() {
        let decoded = vec![
            (PathBuf::from("junk"), Err(SplitError::malformed("invalid magic bytes"))),
            (PathBuf::from("a.0"), Ok(artifact(0, 3))),
            (PathBuf::from("b.1"), Ok(artifact(1, 4))),
        ];
        let err = collect_shares(decoded).unwrap_err();
        assert!(matches!(err, SplitError::InconsistentArtifacts { share: 3, .. }));
    }

    #[test]
    fn test_collect_rejects_mixed_required_pieces() {
        let mut odd = artifact(2, 3);
        odd.share.required_pieces = 3;
        let decoded = vec![(PathBuf::from("a.0"), Ok(artifact(0, 3))), (PathBuf::from("bad"), Err(SplitError::malformed("truncated"))), (PathBuf::from("a.2"), Ok(odd))];
        let err = collect_shares(decoded).unwrap_err();
        assert!(matches!(err, SplitError::InconsistentArtifacts { share: 3, ref reason } if reason.contains("requires 3 pieces")));
    }
}
