use serde::{Deserialize, Serialize};
use tch::Kind;

/// Floating point element types a distribution can sample or hold parameters in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DType {
    Float16,
    BFloat16,
    #[default]
    Float,
    Double,
}

impl From<DType> for Kind {
    fn from(dtype: DType) -> Kind {
        match dtype {
            DType::Float16 => Kind::Half,
            DType::BFloat16 => Kind::BFloat16,
            DType::Float => Kind::Float,
            DType::Double => Kind::Double,
        }
    }
}

/// Settings shared by every distribution.
///
/// `group_ndims` is only stored here; it tells callers how many trailing
/// dimensions of a log-probability form one event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistributionConfig {
    pub dtype: DType,
    pub param_dtype: DType,
    pub is_continuous: bool,
    pub is_reparameterized: bool,
    pub group_ndims: usize,
}

impl Default for DistributionConfig {
    fn default() -> Self {
        DistributionConfig {
            dtype: DType::default(),
            param_dtype: DType::default(),
            is_continuous: true,
            is_reparameterized: true,
            group_ndims: 0,
        }
    }
}

impl DistributionConfig {
    pub fn with_dtype(mut self, dtype: DType) -> Self {
        self.dtype = dtype;
        self
    }

    pub fn with_param_dtype(mut self, param_dtype: DType) -> Self {
        self.param_dtype = param_dtype;
        self
    }

    pub fn with_continuous(mut self, is_continuous: bool) -> Self {
        self.is_continuous = is_continuous;
        self
    }

    pub fn with_reparameterized(mut self, is_reparameterized: bool) -> Self {
        self.is_reparameterized = is_reparameterized;
        self
    }

    pub fn with_group_ndims(mut self, group_ndims: usize) -> Self {
        self.group_ndims = group_ndims;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let config = DistributionConfig::default();
        assert_eq!(config.dtype, DType::Float);
        assert_eq!(config.param_dtype, DType::Float);
        assert!(config.is_continuous);
        assert!(config.is_reparameterized);
        assert_eq!(config.group_ndims, 0);
    }

    #[test]
    fn test_dtype_default() {
        assert_eq!(DType::default(), DType::Float);
        assert_eq!(Kind::from(DType::default()), Kind::Float);
    }

    #[test]
    fn test_builder() {
        let config = DistributionConfig::default()
            .with_dtype(DType::Double)
            .with_param_dtype(DType::Double)
            .with_reparameterized(false)
            .with_group_ndims(1);
        assert_eq!(Kind::from(config.dtype), Kind::Double);
        assert!(!config.is_reparameterized);
        assert_eq!(config.group_ndims, 1);
    }

    #[test]
    fn test_deserialize_partial() {
        let config: DistributionConfig =
            serde_json::from_str(r#"{"dtype": "double", "group_ndims": 2}"#).unwrap();
        assert_eq!(config.dtype, DType::Double);
        assert_eq!(config.param_dtype, DType::Float);
        assert_eq!(config.group_ndims, 2);
        assert!(config.is_reparameterized);
    }

    #[test]
    fn test_serialize() {
        let config = DistributionConfig::default().with_param_dtype(DType::BFloat16);
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains(r#""param_dtype":"bfloat16""#));
        let back: DistributionConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
