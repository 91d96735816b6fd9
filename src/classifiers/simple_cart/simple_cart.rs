use crate::classifiers::Classifier;
use crate::classifiers::simple_cart::nodes::DecisionTree;
use crate::classifiers::simple_cart::options::CartOptions;
use crate::classifiers::simple_cart::pruning::{
    CostComplexityPruner, CrossValidationSelector, CvSelection, PruneSequence,
};
use crate::classifiers::simple_cart::split_criteria::GiniSplitCriterion;
use crate::classifiers::simple_cart::tree_builder::TreeBuilder;
use crate::core::instance_header::InstanceHeader;
use crate::core::instances::{Instance, Instances};
use crate::error::CartError;
use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

const MEASURES: [&str; 4] = [
    "measureTreeSize",
    "measureNumLeaves",
    "measureNumInnerNodes",
    "measureSelectedAlpha",
];

/// CART classifier: Gini splits, fractional missing values and minimal
/// cost-complexity pruning selected by cross-validation.
#[derive(Debug, Clone, Default)]
pub struct SimpleCart {
    options: CartOptions,
    criterion: GiniSplitCriterion,
    header: Option<Arc<InstanceHeader>>,
    tree: Option<DecisionTree>,
    prune_sequence: Option<PruneSequence>,
    cv_selection: Option<CvSelection>,
}

/// Serializable view of a trained model.
#[derive(Debug, Serialize)]
pub struct ModelDump<'a> {
    pub relation: &'a str,
    pub attributes: Vec<String>,
    pub class_attribute: String,
    pub class_labels: Vec<String>,
    pub options: &'a CartOptions,
    pub prune_sequence: Option<&'a PruneSequence>,
    pub cv_selection: Option<&'a CvSelection>,
    pub tree: &'a DecisionTree,
}

impl SimpleCart {
    pub fn new(options: CartOptions) -> Self {
        Self {
            options,
            ..Default::default()
        }
    }

    pub fn options(&self) -> &CartOptions {
        &self.options
    }

    pub fn tree(&self) -> Option<&DecisionTree> {
        self.tree.as_ref()
    }

    pub fn header(&self) -> Option<&InstanceHeader> {
        self.header.as_deref()
    }

    /// Prune sequence of the unpruned tree; `None` when pruning is disabled.
    pub fn prune_sequence(&self) -> Option<&PruneSequence> {
        self.prune_sequence.as_ref()
    }

    pub fn cv_selection(&self) -> Option<&CvSelection> {
        self.cv_selection.as_ref()
    }

    pub fn check_capabilities(&self, data: &Instances) -> Result<(), CartError> {
        data.header().check_capabilities()
    }

    pub fn enumerate_measures(&self) -> &'static [&'static str] {
        &MEASURES
    }

    /// Value of one of the measures listed by [`Self::enumerate_measures`].
    pub fn measure(&self, name: &str) -> Result<f64, CartError> {
        let tree = self.tree.as_ref().ok_or(CartError::NotTrained)?;
        match name {
            "measureTreeSize" => Ok(tree.num_nodes() as f64),
            "measureNumLeaves" => Ok(tree.num_leaves() as f64),
            "measureNumInnerNodes" => Ok(tree.num_inner_nodes() as f64),
            "measureSelectedAlpha" => Ok(self
                .cv_selection
                .as_ref()
                .map_or(0.0, |selection| selection.chosen_alpha)),
            other => Err(CartError::Unsupported(format!("unknown measure '{other}'"))),
        }
    }

    pub fn model_dump(&self) -> Result<ModelDump<'_>, CartError> {
        let (Some(header), Some(tree)) = (self.header.as_deref(), self.tree.as_ref()) else {
            return Err(CartError::NotTrained);
        };
        let class_attribute = header
            .class_attribute()
            .map(|attr| attr.name())
            .unwrap_or_default();
        Ok(ModelDump {
            relation: header.relation_name(),
            attributes: header.attributes.iter().map(|attr| attr.name()).collect(),
            class_attribute,
            class_labels: (0..header.number_of_classes())
                .map(|c| header.class_label(c))
                .collect(),
            options: &self.options,
            prune_sequence: self.prune_sequence.as_ref(),
            cv_selection: self.cv_selection.as_ref(),
            tree,
        })
    }

    /// Copy of `data` the tree is grown on: labeled, optionally subsampled.
    fn training_set(&self, data: &Instances, rng: &mut StdRng) -> Result<Instances, CartError> {
        if data.is_empty() {
            return Err(CartError::InvalidData("training set is empty".into()));
        }
        let mut train = data.clone();
        train.delete_with_missing_class();
        if train.is_empty() || train.sum_of_weights() <= 0.0 {
            return Err(CartError::InvalidData(
                "no labeled instance with positive weight".into(),
            ));
        }

        if self.options.size_per < 1.0 {
            train.randomize(rng);
            let keep = ((train.len() as f64 * self.options.size_per) as usize).max(1);
            train.truncate(keep);
            if train.sum_of_weights() <= 0.0 {
                return Err(CartError::InvalidData(
                    "subsample has no instance with positive weight".into(),
                ));
            }
        }
        Ok(train)
    }
}

impl Classifier for SimpleCart {
    fn build_classifier(&mut self, data: &Instances) -> Result<(), CartError> {
        self.options.validate()?;
        self.check_capabilities(data)?;

        self.tree = None;
        self.prune_sequence = None;
        self.cv_selection = None;
        self.header = None;

        let mut rng = StdRng::seed_from_u64(self.options.seed);
        let train = self.training_set(data, &mut rng)?;
        let unpruned = TreeBuilder::new(&train, &self.criterion, &self.options).build();

        if !self.options.prune {
            info!(
                "grew unpruned tree: {} nodes, {} leaves",
                unpruned.num_nodes(),
                unpruned.num_leaves()
            );
            self.header = Some(data.header_arc());
            self.tree = Some(unpruned);
            return Ok(());
        }

        let mut scratch = unpruned.clone();
        let sequence = CostComplexityPruner::new().build_prune_sequence(&mut scratch);
        let selection = CrossValidationSelector::new(&self.criterion, &self.options)
            .select(&train, &sequence, &mut rng)?;

        let mut tree = unpruned;
        sequence.replay(&mut tree, selection.chosen_index);
        info!(
            "pruned tree: {} nodes, {} leaves (alpha {:.4})",
            tree.num_nodes(),
            tree.num_leaves(),
            selection.chosen_alpha
        );

        self.header = Some(data.header_arc());
        self.tree = Some(tree);
        self.prune_sequence = Some(sequence);
        self.cv_selection = Some(selection);
        Ok(())
    }

    fn distribution_for_instance(&self, instance: &dyn Instance) -> Result<Vec<f64>, CartError> {
        let tree = self.tree.as_ref().ok_or(CartError::NotTrained)?;
        Ok(tree.distribution_for_instance(instance))
    }
}

impl fmt::Display for SimpleCart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (Some(header), Some(tree)) = (self.header.as_deref(), self.tree.as_ref()) else {
            return write!(f, "CART: no model built yet.");
        };
        writeln!(f, "CART Decision Tree")?;
        writeln!(f)?;
        writeln!(f, "{}", tree.to_text(header))?;
        writeln!(f)?;
        writeln!(f, "Number of Leaf Nodes: {}", tree.num_leaves())?;
        writeln!(f)?;
        write!(f, "Size of the Tree: {}", tree.num_nodes())
    }
}
