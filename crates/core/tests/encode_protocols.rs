//! Encoder protocol tests against fake codec tools.
//!
//! These run the real encoders end to end, spawning shell-script stand-ins
//! for the codec programs:
//! - Native attempt, then fallback through an intermediate
//! - Output naming and destination handling
//! - Fallback output matches the same pipeline run by hand
#![cfg(unix)]

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use harbinger_core::{
    encoder::{EncodeJob, Encoder, FlacEncoder, FlacParams, OpusEncoder, OpusParams},
    testing::FakeToolbox,
    tools::{run, run_piped, Tool, ToolError},
};

fn args(items: &[&Path]) -> Vec<OsString> {
    items.iter().map(|p| p.as_os_str().to_owned()).collect()
}

fn strs(items: &[&str]) -> Vec<OsString> {
    items.iter().map(OsString::from).collect()
}

fn write_source(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, body).unwrap();
    path
}

#[tokio::test]
async fn test_flac_fallback_matches_manual_pipeline() {
    let tools = FakeToolbox::install().unwrap();
    let toolbox = tools.toolbox();
    let temp = TempDir::new().unwrap();
    let source = write_source(temp.path(), "broadcast.ac3", "ac3 payload");

    let encoder = FlacEncoder::new(toolbox.clone());
    let dest = encoder
        .encode(EncodeJob::new(&source, FlacParams::new(6, false)))
        .await
        .unwrap();

    // Same steps by hand: decode to an intermediate, then encode it.
    let manual = TempDir::new().unwrap();
    let intermediate = manual.path().join("broadcast.flac");
    let expected = manual.path().join("expected.flac");
    let ffmpeg = toolbox.resolve(Tool::Ffmpeg).unwrap();
    let flac = toolbox.resolve(Tool::Flac).unwrap();

    let mut ffmpeg_args = strs(&["-loglevel", "fatal", "-i"]);
    ffmpeg_args.extend(args(&[&source]));
    ffmpeg_args.extend(strs(&["-c:a", "flac", "-compression_level", "0"]));
    ffmpeg_args.extend(args(&[&intermediate]));
    assert!(run(&ffmpeg, &ffmpeg_args).await.unwrap().is_success());

    let mut flac_args = strs(&["-f", "-6", "-V"]);
    flac_args.extend(args(&[&intermediate]));
    flac_args.extend(strs(&["-o"]));
    flac_args.extend(args(&[&expected]));
    assert!(run(&flac, &flac_args).await.unwrap().is_success());

    assert_eq!(
        std::fs::read(&dest).unwrap(),
        std::fs::read(&expected).unwrap()
    );
}

#[tokio::test]
async fn test_opus_fallback_matches_manual_pipeline() {
    let tools = FakeToolbox::install().unwrap();
    let toolbox = tools.toolbox();
    let temp = TempDir::new().unwrap();
    let source = write_source(temp.path(), "film.ac3", "channels=2\nsurround");

    let encoder = OpusEncoder::new(toolbox.clone());
    let dest = encoder
        .encode(EncodeJob::new(&source, OpusParams::default()))
        .await
        .unwrap();

    let manual = TempDir::new().unwrap();
    let expected = manual.path().join("expected.opus");
    let ffmpeg = toolbox.resolve(Tool::Ffmpeg).unwrap();
    let opusenc = toolbox.resolve(Tool::Opusenc).unwrap();

    let mut ffmpeg_args = strs(&["-loglevel", "fatal", "-i"]);
    ffmpeg_args.extend(args(&[&source]));
    ffmpeg_args.extend(strs(&["-c:a", "flac", "-compression_level", "0", "-f", "flac", "-"]));
    let mut opus_args = strs(&["-", "--bitrate", "192"]);
    opus_args.extend(args(&[&expected]));

    let outcome = run_piped(&ffmpeg, &ffmpeg_args, &opusenc, &opus_args)
        .await
        .unwrap();
    assert!(outcome.is_success());

    assert_eq!(
        std::fs::read(&dest).unwrap(),
        std::fs::read(&expected).unwrap()
    );
}

#[tokio::test]
async fn test_ac3_source_without_destination() {
    let tools = FakeToolbox::install().unwrap();
    let temp = TempDir::new().unwrap();
    let source = write_source(temp.path(), "episode.ac3", "channels=6\n");

    let flac = FlacEncoder::new(tools.toolbox())
        .encode(EncodeJob::new(&source, FlacParams::default()))
        .await
        .unwrap();
    let opus = OpusEncoder::new(tools.toolbox())
        .encode(EncodeJob::new(&source, OpusParams::default()))
        .await
        .unwrap();

    assert_eq!(flac, temp.path().join("episode.flac"));
    assert_eq!(opus, temp.path().join("episode.opus"));
    assert!(std::fs::read_to_string(&flac)
        .unwrap()
        .contains("INTERMEDIATE"));
    assert!(std::fs::read_to_string(&opus)
        .unwrap()
        .starts_with("OPUS 320\nINTERMEDIATE\n"));
}

#[tokio::test]
async fn test_existing_directory_destination() {
    let tools = FakeToolbox::install().unwrap();
    let temp = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let source = write_source(temp.path(), "take 3.wav", "channels=1\n");

    let flac = FlacEncoder::new(tools.toolbox())
        .encode(EncodeJob::new(&source, FlacParams::default()).with_destination(out.path()))
        .await
        .unwrap();
    let opus = OpusEncoder::new(tools.toolbox())
        .encode(EncodeJob::new(&source, OpusParams::default()).with_destination(out.path()))
        .await
        .unwrap();

    assert_eq!(flac, out.path().join("take 3.flac"));
    assert_eq!(opus, out.path().join("take 3.opus"));
    assert!(flac.is_file());
    assert!(opus.is_file());
}

#[tokio::test]
async fn test_explicit_ogg_destination() {
    let tools = FakeToolbox::install().unwrap();
    let temp = TempDir::new().unwrap();
    let source = write_source(temp.path(), "song.flac", "channels=2\n");
    let target = temp.path().join("exports").join("single.ogg");

    let dest = OpusEncoder::new(tools.toolbox())
        .encode(EncodeJob::new(&source, OpusParams::default()).with_destination(&target))
        .await
        .unwrap();

    assert_eq!(dest, target);
    assert!(std::fs::read_to_string(&dest)
        .unwrap()
        .starts_with("OPUS 192\n"));
}

#[tokio::test]
async fn test_scratch_directory_is_removed() {
    let tools = FakeToolbox::install().unwrap();
    let temp = TempDir::new().unwrap();
    let source = write_source(temp.path(), "tape.ac3", "hiss");

    FlacEncoder::new(tools.toolbox())
        .encode(EncodeJob::new(&source, FlacParams::default()))
        .await
        .unwrap();

    let call = tools.calls_to("ffmpeg").pop().unwrap();
    let intermediate = PathBuf::from(call.rsplit(' ').next().unwrap());
    assert_eq!(intermediate.file_name().unwrap(), "tape.flac");
    assert!(!intermediate.exists());
    assert!(!intermediate.parent().unwrap().exists());
}

#[tokio::test]
async fn test_scratch_directory_is_removed_after_failure() {
    for failing in ["flac", "ffmpeg"] {
        let tools = FakeToolbox::install().unwrap();
        tools.fail(failing, 1).unwrap();
        let temp = TempDir::new().unwrap();
        let source = write_source(temp.path(), "tape.ac3", "hiss");

        let err = FlacEncoder::new(tools.toolbox())
            .encode(EncodeJob::new(&source, FlacParams::default()))
            .await
            .unwrap_err();
        assert_eq!(err.failed_tool(), Some(failing));

        let call = tools.calls_to("ffmpeg").pop().unwrap();
        let intermediate = PathBuf::from(call.rsplit(' ').next().unwrap());
        assert_eq!(intermediate.file_name().unwrap(), "tape.flac");
        assert!(!intermediate.parent().unwrap().exists(), "{failing}");
    }
}

#[tokio::test]
async fn test_metaflac_failure_is_reported() {
    let tools = FakeToolbox::install().unwrap();
    tools.fail("metaflac", 2).unwrap();
    let temp = TempDir::new().unwrap();
    let source = write_source(temp.path(), "tape.ac3", "hiss");

    let err = FlacEncoder::new(tools.toolbox())
        .encode(EncodeJob::new(&source, FlacParams::default()))
        .await
        .unwrap_err();

    assert_eq!(err.failed_tool(), Some("metaflac"));
}

#[tokio::test]
async fn test_piped_opusenc_failure_names_opusenc() {
    let tools = FakeToolbox::install().unwrap();
    tools.fail("opusenc", 3).unwrap();
    let temp = TempDir::new().unwrap();
    let source = write_source(temp.path(), "film.ac3", "channels=2\n");

    let err = OpusEncoder::new(tools.toolbox())
        .encode(EncodeJob::new(&source, OpusParams { bitrate: Some(128) }))
        .await
        .unwrap_err();

    assert_eq!(err.failed_tool(), Some("opusenc"));
    assert_eq!(tools.calls_to("opusenc").len(), 2);
}

#[tokio::test]
async fn test_piped_ffmpeg_failure_is_fatal() {
    let tools = FakeToolbox::install().unwrap();
    tools.fail("ffmpeg", 1).unwrap();
    let temp = TempDir::new().unwrap();
    let source = write_source(temp.path(), "film.ac3", "channels=2\n");

    let err = OpusEncoder::new(tools.toolbox())
        .encode(EncodeJob::new(&source, OpusParams { bitrate: Some(128) }))
        .await
        .unwrap_err();

    assert_eq!(err.failed_tool(), Some("ffmpeg"));
}

#[tokio::test]
async fn test_missing_opusenc_is_fatal() {
    let tools = FakeToolbox::install().unwrap();
    tools.remove("opusenc").unwrap();
    let temp = TempDir::new().unwrap();
    let source = write_source(temp.path(), "song.wav", "channels=2\n");

    let err = OpusEncoder::new(tools.toolbox())
        .encode(EncodeJob::new(&source, OpusParams::default()))
        .await
        .unwrap_err();

    assert!(err.is_missing_executable());
    assert!(matches!(
        err,
        harbinger_core::EncodeError::Tool(ToolError::ExecutableNotFound { .. })
    ));
}
