use serde::{Deserialize, Serialize};

use crate::timeframe::{CutMethod, RangePair};

/// Declarative description of a cut: what to read, where to write, and which ranges.
#[derive(Debug, Deserialize, Serialize, Default, PartialEq)]
pub struct Profile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(default)]
    pub cut_method: CutMethod,
    #[serde(default)]
    pub timeframe: Vec<RangePair>,
}

impl Profile {
    pub fn load(path: Option<&str>) -> anyhow::Result<Option<Self>> {
        if let Some(path) = path {
            let contents = std::fs::read_to_string(path)
                .map_err(|e| anyhow::anyhow!("Profile {} not found: {}", path, e))?;
            Ok(Some(Self::from_json(&contents)?))
        } else {
            Ok(None)
        }
    }

    pub fn from_json(contents: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(contents)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_profile() {
        let profile = Profile::from_json(
            r#"{
                "input": "talk.mp4",
                "output": "talk_cut.mp4",
                "cut_method": "delete",
                "timeframe": [
                    {"from": "start", "to": "1m5s"},
                    {"from": "1hr2m", "to": "end"}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(profile.input.as_deref(), Some("talk.mp4"));
        assert_eq!(profile.output.as_deref(), Some("talk_cut.mp4"));
        assert_eq!(profile.cut_method, CutMethod::Delete);
        assert_eq!(
            profile.timeframe,
            vec![RangePair::new("start", "1m5s"), RangePair::new("1hr2m", "end")]
        );
    }

    #[test]
    fn test_defaults() {
        let profile = Profile::from_json("{}").unwrap();
        assert_eq!(profile, Profile::default());
        assert_eq!(profile.cut_method, CutMethod::Select);
    }

    #[test]
    fn test_rejects_unknown_cut_method() {
        assert!(Profile::from_json(r#"{"cut_method": "trim"}"#).is_err());
    }

    #[test]
    fn test_serialize_skips_missing_paths() {
        let profile = Profile {
            timeframe: vec![RangePair::new("10s", "20s")],
            ..Default::default()
        };
        let json = serde_json::to_value(&profile).unwrap();
        assert!(json.get("input").is_none());
        assert_eq!(json["cut_method"], "select");
        assert_eq!(json["timeframe"][0]["to"], "20s");
    }

    #[test]
    fn test_load_without_path() {
        assert!(Profile::load(None).unwrap().is_none());
    }
}
