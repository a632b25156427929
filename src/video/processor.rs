use std::path::Path;
use std::process::Command;

pub struct VideoProcessor;

impl VideoProcessor {
    pub fn get_video_info(ffprobe: &Path, file_path: &Path) -> anyhow::Result<VideoInfo> {
        let mut cmd = Command::new(ffprobe);
        cmd.arg("-v").arg("quiet")
            .arg("-print_format").arg("json")
            .arg("-show_format")
            .arg("-show_streams")
            .arg(file_path);

        let output = crate::video::execute_ffmpeg(cmd)?;

        if !output.status.success() {
            return Err(anyhow::anyhow!("ffprobe failed for {}", file_path.display()));
        }

        let json_str = String::from_utf8(output.stdout)?;
        Self::parse_probe_output(&json_str)
    }

    pub fn parse_probe_output(json_str: &str) -> anyhow::Result<VideoInfo> {
        let info: serde_json::Value = serde_json::from_str(json_str)?;

        let duration = info["format"]["duration"]
            .as_str()
            .and_then(|s| s.parse::<f64>().ok())
            .filter(|d| d.is_finite() && *d > 0.0);

        let empty_vec = vec![];
        let streams = info["streams"].as_array().unwrap_or(&empty_vec);
        let video_stream = streams
            .iter()
            .find(|stream| stream["codec_type"].as_str() == Some("video"))
            .ok_or_else(|| anyhow::anyhow!("No video stream found"))?;

        let width = video_stream["width"].as_u64().unwrap_or(0) as u32;
        let height = video_stream["height"].as_u64().unwrap_or(0) as u32;

        Ok(VideoInfo {
            duration,
            width,
            height,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VideoInfo {
    pub duration: Option<f64>,
    pub width: u32,
    pub height: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_probe_output() {
        let json = r#"{
            "streams": [
                { "codec_type": "audio", "channels": 2 },
                { "codec_type": "video", "width": 1920, "height": 1080 }
            ],
            "format": { "duration": "62.480000" }
        }"#;

        let info = VideoProcessor::parse_probe_output(json).unwrap();
        assert_eq!(info.duration, Some(62.48));
        assert_eq!((info.width, info.height), (1920, 1080));
    }

    #[test]
    fn test_missing_duration_is_unknown() {
        let json = r#"{ "streams": [ { "codec_type": "video", "width": 640, "height": 360 } ], "format": {} }"#;
        let info = VideoProcessor::parse_probe_output(json).unwrap();
        assert!(info.duration.is_none());
    }

    #[test]
    fn test_audio_only_file_is_rejected() {
        let json = r#"{ "streams": [ { "codec_type": "audio" } ], "format": { "duration": "3.0" } }"#;
        assert!(VideoProcessor::parse_probe_output(json).is_err());
    }
}
