use crate::core::instance_header::InstanceHeader;
use crate::core::instances::{DenseInstance, Instance};
use crate::error::CartError;
use rand::Rng;
use std::sync::Arc;

/// An ordered, weighted collection of instances sharing one header.
#[derive(Clone, Debug)]
pub struct Instances {
    header: Arc<InstanceHeader>,
    instances: Vec<DenseInstance>,
}

impl Instances {
    pub fn new(header: Arc<InstanceHeader>) -> Self {
        Self {
            header,
            instances: Vec::new(),
        }
    }

    pub fn with_instances(header: Arc<InstanceHeader>, instances: Vec<DenseInstance>) -> Self {
        Self { header, instances }
    }

    pub fn header(&self) -> &InstanceHeader {
        &self.header
    }

    pub fn header_arc(&self) -> Arc<InstanceHeader> {
        Arc::clone(&self.header)
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn instance(&self, index: usize) -> &DenseInstance {
        &self.instances[index]
    }

    pub fn iter(&self) -> impl Iterator<Item = &DenseInstance> {
        self.instances.iter()
    }

    pub fn push(&mut self, instance: DenseInstance) {
        self.instances.push(instance);
    }

    /// Appends a row built from raw values against this header.
    pub fn add_values(&mut self, values: Vec<f64>, weight: f64) {
        let inst = DenseInstance::new(Arc::clone(&self.header), values, weight);
        self.instances.push(inst);
    }

    pub fn class_index(&self) -> usize {
        self.header.class_index()
    }

    pub fn number_of_classes(&self) -> usize {
        self.header.number_of_classes()
    }

    pub fn sum_of_weights(&self) -> f64 {
        self.instances.iter().map(|inst| inst.weight()).sum()
    }

    pub fn delete_with_missing_class(&mut self) {
        self.instances.retain(|inst| !inst.is_class_missing());
    }

    /// Shuffles the rows in place (Fisher-Yates, last position first).
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for j in (1..self.instances.len()).rev() {
            let k = rng.random_range(0..=j);
            self.instances.swap(j, k);
        }
    }

    pub fn truncate(&mut self, len: usize) {
        self.instances.truncate(len);
    }

    /// Copy of the rows at `indices`, in that order.
    pub fn subset(&self, indices: &[usize]) -> Instances {
        let rows = indices
            .iter()
            .filter_map(|&i| self.instances.get(i).cloned())
            .collect();
        Instances::with_instances(self.header_arc(), rows)
    }

    /// Reorders the rows so that contiguous `test_cv` blocks are stratified by
    /// class: rows are grouped by class, then dealt round-robin into folds.
    pub fn stratify(&mut self, num_folds: usize) -> Result<(), CartError> {
        if num_folds < 2 {
            return Err(CartError::invalid_option(
                "num_folds_pruning",
                format!("at least 2 folds are required, got {num_folds}"),
            ));
        }
        let n = self.instances.len();
        if num_folds > n {
            return Err(CartError::InvalidData(format!(
                "number of folds ({num_folds}) exceeds number of instances ({n})"
            )));
        }

        let mut index = 1;
        while index < n {
            let anchor = self.instances[index - 1].class_value();
            for j in index..n {
                if self.instances[j].class_value() == anchor {
                    self.instances.swap(index, j);
                    index += 1;
                }
            }
            index += 1;
        }

        let mut slots: Vec<Option<DenseInstance>> =
            std::mem::take(&mut self.instances).into_iter().map(Some).collect();
        let mut reordered = Vec::with_capacity(n);
        for start in 0..num_folds {
            let mut j = start;
            while j < n {
                if let Some(inst) = slots[j].take() {
                    reordered.push(inst);
                }
                j += num_folds;
            }
        }
        self.instances = reordered;
        Ok(())
    }

    fn fold_bounds(&self, num_folds: usize, fold: usize) -> (usize, usize) {
        let n = self.instances.len();
        let base = n / num_folds;
        let remainder = n % num_folds;
        let (count, offset) = if fold < remainder {
            (base + 1, fold)
        } else {
            (base, remainder)
        };
        let first = fold * base + offset;
        (first, count)
    }

    /// Held-out block number `fold` out of `num_folds`.
    pub fn test_cv(&self, num_folds: usize, fold: usize) -> Instances {
        let (first, count) = self.fold_bounds(num_folds, fold);
        Instances::with_instances(
            self.header_arc(),
            self.instances[first..first + count].to_vec(),
        )
    }

    /// Every row outside the held-out block number `fold`.
    pub fn train_cv(&self, num_folds: usize, fold: usize) -> Instances {
        let (first, count) = self.fold_bounds(num_folds, fold);
        let mut rows = Vec::with_capacity(self.instances.len() - count);
        rows.extend_from_slice(&self.instances[..first]);
        rows.extend_from_slice(&self.instances[first + count..]);
        Instances::with_instances(self.header_arc(), rows)
    }
}
