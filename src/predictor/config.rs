//! Runtime configuration for building a [Predictor].

use std::fmt;
use std::str::FromStr;

use log::debug;

use crate::error::*;
use crate::predictor::*;

/// The widest history register (and largest table index) we allow.
pub const MAX_HISTORY_BITS: usize = 30;

/// The kind of predictor used for a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum PredictorKind {
    /// Always predict 'taken'
    #[default]
    Static,
    /// [Gshare]
    Gshare,
    /// [Tournament]
    Tournament,
    /// [PerceptronPredictor]
    Custom,
}
impl PredictorKind {
    pub const ALL: [Self; 4] = [
        Self::Static, Self::Gshare, Self::Tournament, Self::Custom,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::Gshare => "gshare",
            Self::Tournament => "tournament",
            Self::Custom => "custom",
        }
    }
}
impl fmt::Display for PredictorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
impl FromStr for PredictorKind {
    type Err = ConfigError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "static" => Ok(Self::Static),
            "gshare" => Ok(Self::Gshare),
            "tournament" => Ok(Self::Tournament),
            "custom" | "perceptron" => Ok(Self::Custom),
            _ => Err(ConfigError::UnknownPredictor(s.to_string())),
        }
    }
}

/// Configuration for a [PerceptronPredictor].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PerceptronConfig {
    /// Number of perceptrons
    pub table_size: usize,

    /// Number of history bits (and non-bias weights per perceptron)
    pub history_len: usize,

    /// Width of each signed weight
    pub weight_bits: u32,

    /// Multiplier used to hash the program counter
    pub multiplier: u32,
}
impl Default for PerceptronConfig {
    fn default() -> Self {
        Self {
            table_size: 426,
            history_len: 20,
            weight_bits: 8,
            multiplier: 19,
        }
    }
}
impl PerceptronConfig {
    /// Training threshold.
    /// Papers suggest this constant (based on the history length).
    pub fn threshold(&self) -> i32 {
        (1.93f64 * self.history_len as f64 + 14.0f64).round() as i32
    }

    /// Get the [approximate] number of storage bits.
    pub fn storage_bits(&self) -> usize {
        let row = (self.history_len + 1) * self.weight_bits as usize;
        row * self.table_size + self.history_len
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.table_size == 0 {
            return Err(ConfigError::EmptyPerceptronTable);
        }
        if self.history_len == 0 {
            return Err(ConfigError::EmptyPerceptronHistory);
        }
        if !(2..=16).contains(&self.weight_bits) {
            return Err(ConfigError::WeightBits(self.weight_bits));
        }
        // Every term of the output sum is at most 2^(weight_bits-1) in
        // magnitude, and the sum is kept in an 'i32'.
        let limit = (self.history_len as u64).checked_add(1)
            .and_then(|terms| terms.checked_mul(1u64 << (self.weight_bits - 1)));
        if limit.map_or(true, |x| x > i32::MAX as u64) {
            return Err(ConfigError::OutputRange {
                history_len: self.history_len,
                weight_bits: self.weight_bits,
            });
        }
        if self.multiplier == 0 {
            return Err(ConfigError::ZeroMultiplier);
        }
        Ok(())
    }

    /// Use this configuration to create a new [PerceptronPredictor].
    pub fn build(self) -> ConfigResult<PerceptronPredictor> {
        self.validate()?;
        Ok(PerceptronPredictor::new(self))
    }
}

/// Configuration for a [Predictor].
///
/// Only the fields used by the selected [PredictorKind] are validated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PredictorConfig {
    pub kind: PredictorKind,

    /// Number of global history bits
    pub ghistory_bits: usize,

    /// Number of local history bits
    pub lhistory_bits: usize,

    /// Number of program counter bits used to index local history
    pub pc_index_bits: usize,

    /// Parameters for [PredictorKind::Custom]
    pub perceptron: PerceptronConfig,
}
impl Default for PredictorConfig {
    fn default() -> Self {
        Self::new(PredictorKind::default())
    }
}
impl PredictorConfig {
    pub const DEFAULT_GHISTORY_BITS: usize = 12;
    pub const DEFAULT_LHISTORY_BITS: usize = 10;
    pub const DEFAULT_PC_INDEX_BITS: usize = 10;

    /// A configuration for 'kind' with default parameters.
    pub fn new(kind: PredictorKind) -> Self {
        Self {
            kind,
            ghistory_bits: Self::DEFAULT_GHISTORY_BITS,
            lhistory_bits: Self::DEFAULT_LHISTORY_BITS,
            pc_index_bits: Self::DEFAULT_PC_INDEX_BITS,
            perceptron: PerceptronConfig::default(),
        }
    }

    fn check_width(name: &'static str, bits: usize) -> ConfigResult<()> {
        if bits == 0 {
            return Err(ConfigError::ZeroWidth { name });
        }
        if bits > MAX_HISTORY_BITS {
            return Err(ConfigError::TooWide { name, bits, max: MAX_HISTORY_BITS });
        }
        Ok(())
    }

    pub fn validate(&self) -> ConfigResult<()> {
        match self.kind {
            PredictorKind::Static => Ok(()),
            PredictorKind::Gshare => {
                Self::check_width("global history", self.ghistory_bits)
            },
            PredictorKind::Tournament => {
                Self::check_width("global history", self.ghistory_bits)?;
                Self::check_width("local history", self.lhistory_bits)?;
                Self::check_width("pc index", self.pc_index_bits)
            },
            PredictorKind::Custom => self.perceptron.validate(),
        }
    }

    /// Use this configuration to create a new [Predictor].
    /// Only the tables used by the selected kind are allocated.
    pub fn build(self) -> ConfigResult<Predictor> {
        self.validate()?;
        let res = match self.kind {
            PredictorKind::Static => Predictor::Static(TakenPredictor),
            PredictorKind::Gshare => {
                Predictor::Gshare(Gshare::new(self.ghistory_bits))
            },
            PredictorKind::Tournament => {
                Predictor::Tournament(Tournament::new(
                    self.ghistory_bits,
                    self.lhistory_bits,
                    self.pc_index_bits,
                ))
            },
            PredictorKind::Custom => {
                Predictor::Custom(self.perceptron.build()?)
            },
        };
        debug!("built {} ({}), {} storage bits", res.name(), self, res.storage_bits());
        Ok(res)
    }
}

impl fmt::Display for PredictorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            PredictorKind::Static => write!(f, "static"),
            PredictorKind::Gshare => write!(f, "gshare:{}", self.ghistory_bits),
            PredictorKind::Tournament => write!(f, "tournament:{}:{}:{}",
                self.ghistory_bits, self.lhistory_bits, self.pc_index_bits
            ),
            PredictorKind::Custom => write!(f, "custom:{}:{}:{}",
                self.perceptron.history_len,
                self.perceptron.table_size,
                self.perceptron.weight_bits,
            ),
        }
    }
}

/// Parse a predictor description of the form `<kind>[:<field>...]`.
///
/// - `static`
/// - `gshare:<ghistory bits>`
/// - `tournament:<ghistory bits>:<lhistory bits>:<pc index bits>`
/// - `custom:<history length>:<table size>:<weight bits>`
///
/// Omitted fields keep their default values. A leading `--` is ignored.
impl FromStr for PredictorConfig {
    type Err = ConfigError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let spec = s.trim().trim_start_matches("--");
        let mut fields = spec.split(':');
        let kind: PredictorKind = fields.next().unwrap_or_default().parse()?;
        let mut cfg = Self::new(kind);

        let values = fields.map(|field| {
            field.parse::<usize>().map_err(|_| ConfigError::InvalidField {
                spec: s.to_string(),
                field: field.to_string(),
            })
        }).collect::<ConfigResult<Vec<usize>>>()?;

        let slots: Vec<&mut usize> = match kind {
            PredictorKind::Static => vec![],
            PredictorKind::Gshare => vec![&mut cfg.ghistory_bits],
            PredictorKind::Tournament => vec![
                &mut cfg.ghistory_bits,
                &mut cfg.lhistory_bits,
                &mut cfg.pc_index_bits,
            ],
            PredictorKind::Custom => vec![
                &mut cfg.perceptron.history_len,
                &mut cfg.perceptron.table_size,
            ],
        };

        let num_slots = slots.len();
        let (usize_values, rest) = values.split_at(values.len().min(num_slots));
        for (slot, value) in slots.into_iter().zip(usize_values) {
            *slot = *value;
        }

        // The perceptron weight width is the only non-'usize' field
        match (kind, rest) {
            (_, []) => {},
            (PredictorKind::Custom, [bits]) => {
                cfg.perceptron.weight_bits = u32::try_from(*bits)
                    .map_err(|_| ConfigError::InvalidField {
                        spec: s.to_string(),
                        field: bits.to_string(),
                    })?;
            },
            _ => return Err(ConfigError::TooManyFields(s.to_string())),
        }
        Ok(cfg)
    }
}
