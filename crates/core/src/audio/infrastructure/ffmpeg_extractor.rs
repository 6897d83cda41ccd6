use std::path::Path;

use crate::audio::domain::audio_extractor::{AudioExtractor, ExtractError};
use crate::shared::constants::WHISPER_SAMPLE_RATE;

/// Extracts a video's audio track to a mono PCM WAV using ffmpeg-next.
///
/// The track is resampled to 16 kHz mono f32, the rate Whisper expects, so
/// the recognizer can feed the file to inference without a second resample.
pub struct FfmpegExtractor;

impl AudioExtractor for FfmpegExtractor {
    fn extract(&self, video: &Path, audio_out: &Path) -> Result<(), ExtractError> {
        log::info!("extracting audio from {}", video.display());

        let samples = decode_audio(video, WHISPER_SAMPLE_RATE)
            .map_err(|e| ExtractError::Ffmpeg {
                path: video.display().to_string(),
                reason: e.to_string(),
            })?
            .ok_or_else(|| ExtractError::NoAudioTrack {
                path: video.display().to_string(),
            })?;

        write_wav(audio_out, &samples, WHISPER_SAMPLE_RATE).map_err(|e| ExtractError::Ffmpeg {
            path: audio_out.display().to_string(),
            reason: e.to_string(),
        })?;

        log::info!("audio extracted to {}", audio_out.display());
        Ok(())
    }
}

/// Decode the best audio stream of a media file to mono f32 samples at
/// `target_sample_rate`. Returns `None` when the file has no audio stream.
pub fn decode_audio(
    path: &Path,
    target_sample_rate: u32,
) -> Result<Option<Vec<f32>>, ffmpeg_next::Error> {
    ffmpeg_next::init()?;

    let mut ictx = ffmpeg_next::format::input(path)?;

    let audio_stream = match ictx.streams().best(ffmpeg_next::media::Type::Audio) {
        Some(stream) => stream,
        None => return Ok(None),
    };

    let audio_stream_index = audio_stream.index();
    let codec_ctx =
        ffmpeg_next::codec::context::Context::from_parameters(audio_stream.parameters())?;
    let mut decoder = codec_ctx.decoder().audio()?;

    let mut resampler = ffmpeg_next::software::resampling::Context::get(
        decoder.format(),
        decoder.channel_layout(),
        decoder.rate(),
        ffmpeg_next::format::Sample::F32(ffmpeg_next::format::sample::Type::Planar),
        ffmpeg_next::ChannelLayout::MONO,
        target_sample_rate,
    )?;

    let mut samples: Vec<f32> = Vec::new();
    let mut decoded = ffmpeg_next::util::frame::audio::Audio::empty();
    let mut resampled = ffmpeg_next::util::frame::audio::Audio::empty();

    for (stream, packet) in ictx.packets() {
        if stream.index() != audio_stream_index {
            continue;
        }
        decoder.send_packet(&packet)?;
        while decoder.receive_frame(&mut decoded).is_ok() {
            resampler.run(&decoded, &mut resampled)?;
            collect_f32_samples(&resampled, &mut samples);
        }
    }

    decoder.send_eof()?;
    while decoder.receive_frame(&mut decoded).is_ok() {
        resampler.run(&decoded, &mut resampled)?;
        collect_f32_samples(&resampled, &mut samples);
    }

    if let Ok(Some(delay)) = resampler.flush(&mut resampled) {
        if delay.output > 0 {
            collect_f32_samples(&resampled, &mut samples);
        }
    }

    Ok(Some(samples))
}

fn collect_f32_samples(frame: &ffmpeg_next::util::frame::audio::Audio, out: &mut Vec<f32>) {
    let num_samples = frame.samples();
    if num_samples == 0 {
        return;
    }
    let data = frame.data(0);
    let floats = unsafe { std::slice::from_raw_parts(data.as_ptr() as *const f32, num_samples) };
    out.extend_from_slice(floats);
}

/// Encode mono f32 samples as a PCM WAV file.
pub(crate) fn write_wav(
    path: &Path,
    samples: &[f32],
    sample_rate: u32,
) -> Result<(), ffmpeg_next::Error> {
    ffmpeg_next::init()?;

    let mut octx = ffmpeg_next::format::output(path)?;

    let codec = ffmpeg_next::encoder::find(ffmpeg_next::codec::Id::PCM_F32LE)
        .ok_or(ffmpeg_next::Error::EncoderNotFound)?;
    let mut ost = octx.add_stream(Some(codec))?;
    let ost_idx = ost.index();

    let mut encoder = ffmpeg_next::codec::context::Context::new_with_codec(codec)
        .encoder()
        .audio()?;
    encoder.set_rate(sample_rate as i32);
    encoder.set_channel_layout(ffmpeg_next::ChannelLayout::MONO);
    encoder.set_format(ffmpeg_next::format::Sample::F32(
        ffmpeg_next::format::sample::Type::Packed,
    ));
    encoder.set_time_base(ffmpeg_next::Rational(1, sample_rate as i32));

    let mut encoder = encoder.open_as(codec)?;
    ost.set_parameters(&encoder);

    let enc_time_base = encoder.time_base();
    octx.write_header()?;
    let ost_time_base = octx
        .stream(ost_idx)
        .ok_or(ffmpeg_next::Error::StreamNotFound)?
        .time_base();

    // PCM encoders report no fixed frame size; chunk at 1024 samples.
    let frame_size = match encoder.frame_size() as usize {
        0 => 1024,
        n => n,
    };

    let mut pts: i64 = 0;
    for chunk in samples.chunks(frame_size) {
        let mut frame = ffmpeg_next::util::frame::audio::Audio::new(
            ffmpeg_next::format::Sample::F32(ffmpeg_next::format::sample::Type::Packed),
            chunk.len(),
            ffmpeg_next::ChannelLayout::MONO,
        );
        frame.set_rate(sample_rate);
        frame.set_pts(Some(pts));

        let dst = frame.data_mut(0);
        let src_bytes =
            unsafe { std::slice::from_raw_parts(chunk.as_ptr() as *const u8, chunk.len() * 4) };
        dst[..src_bytes.len()].copy_from_slice(src_bytes);

        encoder.send_frame(&frame)?;
        drain_packets(&mut encoder, &mut octx, ost_idx, enc_time_base, ost_time_base)?;
        pts += chunk.len() as i64;
    }

    encoder.send_eof()?;
    drain_packets(&mut encoder, &mut octx, ost_idx, enc_time_base, ost_time_base)?;
    octx.write_trailer()?;

    Ok(())
}

fn drain_packets(
    encoder: &mut ffmpeg_next::codec::encoder::audio::Encoder,
    octx: &mut ffmpeg_next::format::context::Output,
    stream_idx: usize,
    enc_time_base: ffmpeg_next::Rational,
    ost_time_base: ffmpeg_next::Rational,
) -> Result<(), ffmpeg_next::Error> {
    let mut encoded = ffmpeg_next::Packet::empty();
    while encoder.receive_packet(&mut encoded).is_ok() {
        encoded.set_stream(stream_idx);
        encoded.rescale_ts(enc_time_base, ost_time_base);
        encoded.write_interleaved(octx)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_extract_nonexistent_video_errors() {
        let tmp = TempDir::new().unwrap();
        let extractor = FfmpegExtractor;
        let video = if cfg!(windows) {
            Path::new("Z:\\nonexistent\\clip.mp4")
        } else {
            Path::new("/nonexistent/clip.mp4")
        };
        let result = extractor.extract(video, &tmp.path().join("audio.wav"));
        assert!(matches!(result, Err(ExtractError::Ffmpeg { .. })));
    }

    #[test]
    fn test_extract_failure_writes_no_output() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("audio.wav");
        let _ = FfmpegExtractor.extract(Path::new("/nonexistent/clip.mp4"), &out);
        assert!(!out.exists());
    }

    #[test]
    fn test_decode_audio_nonexistent_file_errors() {
        let result = decode_audio(Path::new("/nonexistent/audio.wav"), 16000);
        assert!(result.is_err());
    }

    #[test]
    fn test_wav_round_trip() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("tone.wav");

        let sample_rate = 16000u32;
        let samples: Vec<f32> = (0..sample_rate)
            .map(|i| {
                let t = i as f64 / sample_rate as f64;
                (2.0 * std::f64::consts::PI * 440.0 * t).sin() as f32 * 0.5
            })
            .collect();

        write_wav(&out, &samples, sample_rate).expect("write failed");
        assert!(out.exists());

        let decoded = decode_audio(&out, sample_rate)
            .expect("decode failed")
            .expect("no audio stream");
        // Same rate in and out, so the length should survive near-intact.
        let delta = decoded.len() as i64 - samples.len() as i64;
        assert!(delta.abs() < 64, "unexpected length change: {delta}");
        let energy: f64 = decoded.iter().map(|s| (*s as f64).powi(2)).sum();
        assert!(energy > 0.0);
    }
}
