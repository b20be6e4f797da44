//! Integer programs for the k-MST problem.
//!
//! Every formulation orients each edge both ways, shares the [`TreeSkeleton`] and then hands the
//! arc variables to exactly one [`ConnectivityEncoder`], chosen by [`ModelType`].

pub mod mcf;
pub mod mtz;
pub mod scf;
pub mod skeleton;

use std::{fmt::{self, Display}, str::FromStr};
use tracing::info;
use crate::{instance::Instance, model::{Model, VarId}, solver::errors::UnknownModelTypeError};
use self::{mcf::MultiCommodityFlow, mtz::MillerTuckerZemlin, scf::SingleCommodityFlow, skeleton::TreeSkeleton};





#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ModelType {
    Scf,
    Mcf,
    Mtz,
}

// ModelType::ModelType
impl ModelType {
    pub const ALL: [ModelType; 3] = [ModelType::Scf, ModelType::Mcf, ModelType::Mtz];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelType::Scf => "scf",
            ModelType::Mcf => "mcf",
            ModelType::Mtz => "mtz",
        }
    }
}

// ModelType::FromStr
impl FromStr for ModelType {
    type Err = UnknownModelTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "scf" => Ok(ModelType::Scf),
            "mcf" => Ok(ModelType::Mcf),
            "mtz" => Ok(ModelType::Mtz),
            _ => Err(UnknownModelTypeError(s.to_string())),
        }
    }
}

// ModelType::Display
impl Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}



/// What k counts. The selected arc total K includes the single arc leaving the root.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SizeConvention {
    /// k non-root nodes are reached, K = k.
    #[default]
    Nodes,
    /// k tree edges run between non-root nodes, K = k + 1.
    Edges,
}



#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FormulationConfig {
    pub model_type: ModelType,
    pub k: usize,
    pub size_convention: SizeConvention,
    pub strengthened: bool,
}

// FormulationConfig::FormulationConfig
impl FormulationConfig {
    pub fn new(model_type: ModelType, k: usize) -> Self {
        FormulationConfig { model_type, k, size_convention: SizeConvention::Nodes, strengthened: false }
    }

    pub fn with_size_convention(mut self, size_convention: SizeConvention) -> Self {
        self.size_convention = size_convention;
        self
    }

    pub fn strengthened(mut self, strengthened: bool) -> Self {
        self.strengthened = strengthened;
        self
    }

    /// Number of arcs the solution has to select. k = 0 asks for a spanning tree.
    pub fn arc_target(&self, n_nodes: usize) -> usize {
        if self.k == 0 {
            return n_nodes.saturating_sub(1);
        }
        match self.size_convention {
            SizeConvention::Nodes => self.k,
            SizeConvention::Edges => self.k + 1,
        }
    }
}



/// Variables the active encoder added on top of the arc variables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuxiliaryVariables {
    /// One flow variable per arc.
    Flow(Vec<VarId>),
    /// `commodities[c][a]` routes commodity c over arc a; row 0 is empty.
    Commodities(Vec<Vec<VarId>>),
    /// One potential per node.
    Potentials(Vec<VarId>),
}



pub trait ConnectivityEncoder {
    fn encode(&self, skeleton: &mut TreeSkeleton) -> AuxiliaryVariables;
}



#[derive(Clone, Debug)]
pub struct Formulation {
    pub model: Model,
    pub model_type: ModelType,
    pub arcs: Vec<VarId>,
    pub arc_target: usize,
    pub auxiliary: AuxiliaryVariables,
}



pub struct FormulationBuilder<'a> {
    instance: &'a Instance,
    config: FormulationConfig,
}

// FormulationBuilder::FormulationBuilder
impl<'a> FormulationBuilder<'a> {
    #[inline]
    pub fn new(instance: &'a Instance, config: FormulationConfig) -> Self {
        FormulationBuilder { instance, config }
    }

    pub fn build(&self) -> Formulation {
        let arc_target: usize = self.config.arc_target(self.instance.n_nodes());
        let mut skeleton: TreeSkeleton = TreeSkeleton::new(self.instance, arc_target);
        let strengthened: bool = self.config.strengthened;
        let auxiliary: AuxiliaryVariables = match self.config.model_type {
            ModelType::Scf => SingleCommodityFlow { strengthened }.encode(&mut skeleton),
            ModelType::Mcf => MultiCommodityFlow.encode(&mut skeleton),
            ModelType::Mtz => MillerTuckerZemlin { strengthened }.encode(&mut skeleton),
        };
        skeleton.add_objective();
        info!(
            "Built {} model with {} variables and {} constraints (K = {})",
            self.config.model_type,
            skeleton.model.variables().len(),
            skeleton.model.constraints().len(),
            arc_target
        );
        Formulation { model: skeleton.model, model_type: self.config.model_type, arcs: skeleton.arcs, arc_target, auxiliary }
    }
}
