
/*!
Contains configuration information for the prefix-search decoders.
Typical usage is to use the builder to construct the config, e.g.
```
use prefix_con::decoder_config::{DecoderConfig, DecoderConfigBuilder};
let config: DecoderConfig = DecoderConfigBuilder::default()
    .max_search_nodes(10_000)
    .build()
    .unwrap();
```
*/

/**
Contains configuration information for the prefix-search decoders.
Typical usage is to use the builder to construct the config, e.g.
```
use prefix_con::decoder_config::{DecoderConfig, DecoderConfigBuilder};
let config: DecoderConfig = DecoderConfigBuilder::default()
    .max_search_nodes(10_000)
    .build()
    .unwrap();
```
*/
#[derive(derive_builder::Builder, Clone, Debug)]
#[builder(default)]
pub struct DecoderConfig {
    /// Maximum number of explored nodes before the search gives up; worst-case search
    /// cost is exponential when the profile is near-uniform, and this is the caller's
    /// cap on that
    pub max_search_nodes: usize,
    /// Maximum frontier size, which controls how many open prefixes we allow at once
    pub max_queue_size: usize
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            // generous: sharp profiles explore a few nodes per label symbol
            max_search_nodes: 1_000_000,
            // the frontier grows by at most K nodes per exploration
            max_queue_size: 1_000_000
        }
    }
}
