use anyhow::{Context, Result};
use nalgebra::{Unit, Vector3};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub retarget: RetargetConfig,
    #[serde(default)]
    pub replay: ReplayConfig,
}

/// 再構成エンジンの定数
#[derive(Debug, Deserialize, Clone)]
pub struct RetargetConfig {
    /// 頭部マーカー平均から骨盤までの平均距離（メートル）
    #[serde(default = "default_head_to_pelvis")]
    pub head_to_pelvis: f32,
    /// 足部マーカーが無いときに仮定する脚長（メートル）
    #[serde(default = "default_leg_length")]
    pub leg_length: f32,
    /// 足首マーカーに加算する高さ（メートル）
    #[serde(default = "default_ankle_height")]
    pub ankle_height: f32,
    /// 正面ベクトルの長さ二乗の下限。これ未満なら向きを更新しない
    #[serde(default = "default_min_facing_length_sq")]
    pub min_facing_length_sq: f32,
    /// ボーンの基準軸（レスト姿勢でボーンが向く方向）
    #[serde(default = "default_rest_axis")]
    pub rest_axis: [f32; 3],
}

fn default_head_to_pelvis() -> f32 { 0.80 }
fn default_leg_length() -> f32 { 0.90 }
fn default_ankle_height() -> f32 { 0.05 }
fn default_min_facing_length_sq() -> f32 { 0.001 }
fn default_rest_axis() -> [f32; 3] { [0.0, 1.0, 0.0] }

impl Default for RetargetConfig {
    fn default() -> Self {
        Self {
            head_to_pelvis: default_head_to_pelvis(),
            leg_length: default_leg_length(),
            ankle_height: default_ankle_height(),
            min_facing_length_sq: default_min_facing_length_sq(),
            rest_axis: default_rest_axis(),
        }
    }
}

impl RetargetConfig {
    /// 正規化済みの基準軸。ゼロ・非有限なら +Y
    pub fn rest_axis(&self) -> Unit<Vector3<f32>> {
        let [x, y, z] = self.rest_axis;
        let v = Vector3::new(x, y, z);
        if !v.iter().all(|c| c.is_finite()) {
            return Vector3::y_axis();
        }
        Unit::try_new(v, 1e-6).unwrap_or_else(Vector3::y_axis)
    }
}

/// リプレイCLIの設定
#[derive(Debug, Deserialize, Clone)]
pub struct ReplayConfig {
    /// スケルトン定義ファイル。未指定なら組み込みの人型リグ
    #[serde(default)]
    pub skeleton: Option<String>,
    /// 実行ログの出力先
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
}

fn default_log_dir() -> String { "logs".to_string() }

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            skeleton: None,
            log_dir: default_log_dir(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// 読めなければ既定値（警告のみ）
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("{:#}. Using defaults.", e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!((config.retarget.head_to_pelvis - 0.8).abs() < 1e-6);
        assert!((config.retarget.leg_length - 0.9).abs() < 1e-6);
        assert!((config.retarget.ankle_height - 0.05).abs() < 1e-6);
        assert_eq!(config.replay.log_dir, "logs");
        assert!(config.replay.skeleton.is_none());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
[retarget]
leg_length = 1.0
"#,
        )
        .unwrap();
        assert!((config.retarget.leg_length - 1.0).abs() < 1e-6);
        assert!((config.retarget.head_to_pelvis - 0.8).abs() < 1e-6);
        assert_eq!(config.retarget.rest_axis, [0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_rest_axis_normalized() {
        let mut config = RetargetConfig::default();
        config.rest_axis = [0.0, 0.0, 2.0];
        assert!((config.rest_axis().into_inner() - Vector3::z()).norm() < 1e-6);

        config.rest_axis = [0.0, 0.0, 0.0];
        assert_eq!(config.rest_axis(), Vector3::y_axis());

        config.rest_axis = [f32::NAN, 0.0, 0.0];
        assert_eq!(config.rest_axis(), Vector3::y_axis());
    }

    #[test]
    fn test_load_and_fallback() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[replay]\nskeleton = \"rig.toml\"").unwrap();
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.replay.skeleton.as_deref(), Some("rig.toml"));

        assert!(Config::load("/nonexistent/config.toml").is_err());
        let config = Config::load_or_default("/nonexistent/config.toml");
        assert_eq!(config.replay.log_dir, "logs");
    }
}
