/// Settings of the sequencing worker owned by each chain.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ChainConfig {
    pub worker_name: &'static str,
    pub worker_stack_size: usize,
}

impl ChainConfig {
    fn try_from_str(s: &'static str) -> Result<Self, ()> {
        let mut iter = s.split_terminator(':');
        let worker_name: &str = iter.next().filter(|x| !x.is_empty()).ok_or(())?;
        let worker_stack_size: usize = iter.next().ok_or(())?.parse().or(Err(()))?;
        if iter.next().is_some() {
            return Err(());
        }
        Ok(ChainConfig {
            worker_name,
            worker_stack_size,
        })
    }

    /// Reads `DAISYCHAIN_CONFIG`, formatted as `name:stack_size`, at build time.
    pub fn from_env_var() -> Result<Self, ()> {
        if let Some(s) = option_env!("DAISYCHAIN_CONFIG") {
            ChainConfig::try_from_str(s)
        } else {
            Err(())
        }
    }
}

impl Default for ChainConfig {
    fn default() -> Self {
        ChainConfig {
            worker_name: "daisychain",
            worker_stack_size: 256 * 1024,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct StdAnimatorConfig {
    pub thread_name: &'static str,
    /// Multiplies every delay and duration, `0.0` plays everything instantly.
    pub time_scale: f32,
}

impl Default for StdAnimatorConfig {
    fn default() -> Self {
        StdAnimatorConfig {
            thread_name: "animator",
            time_scale: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_config_from_str() {
        let config = ChainConfig::try_from_str("chain:131072").unwrap();
        assert_eq!(config.worker_name, "chain");
        assert_eq!(config.worker_stack_size, 131072);
    }

    #[test]
    fn test_chain_config_from_malformed_str() {
        assert!(ChainConfig::try_from_str("").is_err());
        assert!(ChainConfig::try_from_str("chain").is_err());
        assert!(ChainConfig::try_from_str(":4096").is_err());
        assert!(ChainConfig::try_from_str("chain:big").is_err());
        assert!(ChainConfig::try_from_str("chain:4096:extra").is_err());
    }

    #[test]
    fn test_chain_config_from_env_var_falls_back() {
        let config = ChainConfig::from_env_var().unwrap_or_default();
        assert!(config.worker_stack_size > 0);
    }
}
