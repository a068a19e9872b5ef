//! Conversion and tagging of downloaded tracks.
//!
//! Post-processing is best effort. The file is already on disk when it runs,
//! so a failed conversion or tagging step is reported and logged but never
//! turns a successful download into a failed one.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;
use lofty::{Accessor, ItemKey, Probe, Tag, TagExt, TaggedFileExt};
use tokio::fs;
use tokio::process::Command;

use crate::config::PostProcessingConfig;
use crate::download::report::ErrorReporter;
use crate::error::{Error, Result};
use crate::fs::artist_string;
use crate::media::Track;

/// Re-encodes audio into a lossless container.
#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Read `source` and write ALAC (16 bit, 44.1 kHz, stereo) to `destination`.
    async fn to_lossless(&self, source: &Path, destination: &Path) -> Result<()>;
}

/// Writes descriptive metadata into an audio file.
#[async_trait]
pub trait Tagger: Send + Sync {
    async fn set_metadata(&self, track: &Track, path: &Path) -> Result<()>;
}

/// Transcoder backed by the ffmpeg binary.
pub struct FfmpegTranscoder {
    ffmpeg: PathBuf,
}

impl FfmpegTranscoder {
    pub fn new(ffmpeg: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
        }
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    async fn to_lossless(&self, source: &Path, destination: &Path) -> Result<()> {
        let output = Command::new(&self.ffmpeg)
            .arg("-y")
            .arg("-i")
            .arg(source)
            .args(["-vn", "-c:a", "alac", "-sample_fmt", "s16p"])
            .args(["-ar", "44100", "-ac", "2", "-f", "ipod"])
            .arg(destination)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Error::FFmpegNotFound
                } else {
                    Error::FFmpeg(format!("Failed to run ffmpeg: {}", e))
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let last_line = stderr.lines().last().unwrap_or("").trim().to_string();
            return Err(Error::FFmpeg(format!(
                "ffmpeg exited with status {}: {}",
                output.status, last_line
            )));
        }

        Ok(())
    }
}

/// Tagger backed by lofty.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoftyTagger;

#[async_trait]
impl Tagger for LoftyTagger {
    async fn set_metadata(&self, track: &Track, path: &Path) -> Result<()> {
        let track = track.clone();
        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || write_tags(&track, &path)).await?
    }
}

fn write_tags(track: &Track, path: &Path) -> Result<()> {
    let mut tagged_file = Probe::open(path)?.read()?;

    if tagged_file.primary_tag().is_none() {
        let tag_type = tagged_file.primary_tag_type();
        tagged_file.insert_tag(Tag::new(tag_type));
    }
    let tag = tagged_file
        .primary_tag_mut()
        .ok_or_else(|| Error::Download(format!("No writable tag in {}", path.display())))?;

    fill_tag(tag, track);
    tag.save_to_path(path)?;
    Ok(())
}

fn fill_tag(tag: &mut Tag, track: &Track) {
    tag.set_title(track.full_title());
    tag.set_artist(artist_string(&track.artists));
    tag.set_track(track.track_number);
    if let Some(volume) = track.volume_number {
        tag.set_disk(volume);
    }
    if let Some(album) = &track.album {
        tag.set_album(album.title.clone());
        if let Some(year) = album
            .release_date
            .as_deref()
            .and_then(|d| d.get(..4))
            .and_then(|y| y.parse().ok())
        {
            tag.set_year(year);
        }
    }
    if let Some(main) = track.artists.first() {
        tag.insert_text(ItemKey::AlbumArtist, main.name.clone());
    }
    if let Some(copyright) = &track.copyright {
        tag.insert_text(ItemKey::CopyrightMessage, copyright.clone());
    }
    if let Some(isrc) = &track.isrc {
        tag.insert_text(ItemKey::Isrc, isrc.clone());
    }
}

/// Which enrichment steps succeeded for a track.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichmentOutcome {
    pub converted: bool,
    pub tagged: bool,
}

/// Runs conversion and tagging after a track download.
pub struct PostProcessor {
    transcoder: Option<Arc<dyn Transcoder>>,
    tagger: Option<Arc<dyn Tagger>>,
    reporter: Arc<dyn ErrorReporter>,
}

impl PostProcessor {
    /// `None` skips the corresponding step.
    pub fn new(
        transcoder: Option<Arc<dyn Transcoder>>,
        tagger: Option<Arc<dyn Tagger>>,
        reporter: Arc<dyn ErrorReporter>,
    ) -> Self {
        Self {
            transcoder,
            tagger,
            reporter,
        }
    }

    /// Build the ffmpeg/lofty pipeline the configuration asks for.
    pub fn from_config(config: &PostProcessingConfig, reporter: Arc<dyn ErrorReporter>) -> Self {
        let transcoder: Option<Arc<dyn Transcoder>> = if config.convert_to_lossless {
            Some(Arc::new(FfmpegTranscoder::new(config.ffmpeg_path.clone())))
        } else {
            None
        };
        let tagger: Option<Arc<dyn Tagger>> = if config.write_metadata {
            Some(Arc::new(LoftyTagger))
        } else {
            None
        };

        Self::new(transcoder, tagger, reporter)
    }

    /// Convert the file at `path` in place, then tag it.
    pub async fn normalize_and_tag(&self, path: &Path, track: &Track) -> EnrichmentOutcome {
        let mut outcome = EnrichmentOutcome::default();

        if let Some(transcoder) = &self.transcoder {
            match convert_in_place(transcoder.as_ref(), path).await {
                Ok(()) => outcome.converted = true,
                Err(e) => {
                    tracing::warn!("Conversion of {} failed: {}", path.display(), e);
                    self.reporter
                        .report("ALAC: Error converting file", &format!("{}: {}", path.display(), e));
                }
            }
        }

        if let Some(tagger) = &self.tagger {
            match tagger.set_metadata(track, path).await {
                Ok(()) => outcome.tagged = true,
                Err(e) => {
                    tracing::warn!("Tagging of {} failed: {}", path.display(), e);
                    self.reporter
                        .report("Error writing metadata", &format!("{}: {}", path.display(), e));
                }
            }
        }

        outcome
    }
}

/// Sibling path the original is moved to while converting: `name-temp.ext`.
pub fn temp_path_for(path: &Path) -> Result<PathBuf> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| Error::PathBuild(format!("No file name in {}", path.display())))?;

    let name = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}-temp.{}", stem, ext),
        None => format!("{}-temp", stem),
    };

    Ok(path.with_file_name(name))
}

/// Move the file aside, transcode it back to `path`, remove the temp file.
///
/// If transcoding fails the original file is moved back into place.
async fn convert_in_place(transcoder: &dyn Transcoder, path: &Path) -> Result<()> {
    let temp_path = temp_path_for(path)?;

    if fs::try_exists(&temp_path).await? {
        fs::remove_file(&temp_path).await?;
    }
    fs::rename(path, &temp_path).await?;

    if let Err(e) = transcoder.to_lossless(&temp_path, path).await {
        let _ = fs::remove_file(path).await;
        fs::rename(&temp_path, path).await?;
        return Err(e);
    }

    fs::remove_file(&temp_path).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::download::stub::{
        CopyTranscoder, FailingTranscoder, RecordingReporter, RecordingTagger,
    };
    use lofty::TagType;
    use tempfile::TempDir;

    #[test]
    fn test_temp_path() {
        assert_eq!(
            temp_path_for(Path::new("/music/1 Song - A.m4a")).unwrap(),
            PathBuf::from("/music/1 Song - A-temp.m4a")
        );
        assert_eq!(
            temp_path_for(Path::new("/music/noext")).unwrap(),
            PathBuf::from("/music/noext-temp")
        );
    }

    #[tokio::test]
    async fn test_convert_and_tag() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("1 Song - A.m4a");
        std::fs::write(&path, b"raw").unwrap();

        let reporter = Arc::new(RecordingReporter::default());
        let tagger = Arc::new(RecordingTagger::default());
        let processor = PostProcessor::new(
            Some(Arc::new(CopyTranscoder)),
            Some(tagger.clone()),
            reporter.clone(),
        );

        let track = Track {
            id: 1,
            ..Default::default()
        };
        let outcome = processor.normalize_and_tag(&path, &track).await;

        assert_eq!(
            outcome,
            EnrichmentOutcome {
                converted: true,
                tagged: true
            }
        );
        assert_eq!(std::fs::read(&path).unwrap(), b"raw");
        assert!(!temp_path_for(&path).unwrap().exists());
        assert_eq!(tagger.tagged(), vec![1]);
        assert!(reporter.reports().is_empty());
    }

    #[tokio::test]
    async fn test_failed_conversion_keeps_original() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("1 Song - A.m4a");
        std::fs::write(&path, b"raw").unwrap();

        let reporter = Arc::new(RecordingReporter::default());
        let processor = PostProcessor::new(
            Some(Arc::new(FailingTranscoder)),
            Some(Arc::new(RecordingTagger::default())),
            reporter.clone(),
        );

        let outcome = processor
            .normalize_and_tag(&path, &Track::default())
            .await;

        assert!(!outcome.converted);
        assert!(outcome.tagged);
        assert_eq!(std::fs::read(&path).unwrap(), b"raw");
        assert!(!temp_path_for(&path).unwrap().exists());
        assert_eq!(reporter.reports().len(), 1);
    }

    #[tokio::test]
    async fn test_stale_temp_file_is_replaced() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("t.m4a");
        std::fs::write(&path, b"fresh").unwrap();
        std::fs::write(temp_path_for(&path).unwrap(), b"stale").unwrap();

        convert_in_place(&CopyTranscoder, &path).await.unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"fresh");
        assert!(!temp_path_for(&path).unwrap().exists());
    }

    #[test]
    fn test_fill_tag() {
        let track = Track {
            id: 1,
            title: "Gimme Shelter".into(),
            track_number: 1,
            volume_number: Some(1),
            artists: vec![crate::media::Artist {
                name: "The Rolling Stones".into(),
                ..Default::default()
            }],
            isrc: Some("GBCKS6900001".into()),
            copyright: Some("ABKCO".into()),
            ..Default::default()
        };

        let mut tag = Tag::new(TagType::Id3v2);
        fill_tag(&mut tag, &track);

        assert_eq!(tag.title().as_deref(), Some("Gimme Shelter"));
        assert_eq!(tag.artist().as_deref(), Some("The Rolling Stones"));
        assert_eq!(tag.track(), Some(1));
        assert_eq!(tag.get_string(&ItemKey::Isrc), Some("GBCKS6900001"));
        assert_eq!(tag.get_string(&ItemKey::CopyrightMessage), Some("ABKCO"));
    }

    #[test]
    fn test_fill_tag_without_isrc() {
        let mut tag = Tag::new(TagType::Id3v2);
        fill_tag(&mut tag, &Track::default());
        assert_eq!(tag.get_string(&ItemKey::Isrc), None);
    }

    #[tokio::test]
    async fn test_lofty_tagger_reports_unreadable_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("garbage.m4a");
        std::fs::write(&path, b"definitely not audio").unwrap();

        let result = LoftyTagger.set_metadata(&Track::default(), &path).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_disabled_steps_do_nothing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("t.m4a");
        std::fs::write(&path, b"raw").unwrap();

        let reporter = Arc::new(RecordingReporter::default());
        let processor = PostProcessor::new(None, None, reporter.clone());
        let outcome = processor.normalize_and_tag(&path, &Track::default()).await;

        assert_eq!(outcome, EnrichmentOutcome::default());
        assert!(reporter.reports().is_empty());
    }
}
