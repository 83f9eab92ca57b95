use padpack::io::ext_repr::{ExtPackInput, ExtPackOutput};
use serde::{Deserialize, Serialize};

use crate::config::CliConfig;

/// Everything written to the JSON output file of a run
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PackRunOutput {
    #[serde(flatten)]
    pub input: ExtPackInput,
    pub solution: ExtPackOutput,
    pub config: CliConfig,
}
