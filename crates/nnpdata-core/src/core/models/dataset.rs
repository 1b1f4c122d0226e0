use super::error::ModelError;
use super::sample::Sample;
use rand::{SeedableRng, rngs::StdRng, seq::index};
use std::collections::{HashMap, HashSet};
use tracing::{debug, instrument};

/// Seed used by callers that do not choose their own.
pub const DEFAULT_SEED: u64 = 1234;

/// An ordered collection of samples.
///
/// Samples keep their append order. The curation operations ([`random_subset`],
/// [`select`] and [`delete`]) replace the contents in place and return `&mut Self`
/// so that they can be chained.
///
/// [`random_subset`]: DataSet::random_subset
/// [`select`]: DataSet::select
/// [`delete`]: DataSet::delete
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataSet {
    samples: Vec<Sample>,
}

impl DataSet {
    /// Creates an empty dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a sample to the end of the dataset.
    pub fn append(&mut self, sample: Sample) -> &mut Self {
        self.samples.push(sample);
        self
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn samples_mut(&mut self) -> &mut [Sample] {
        &mut self.samples
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.samples.iter()
    }

    /// Removes every sample.
    pub fn clear(&mut self) -> &mut Self {
        self.samples.clear();
        self
    }

    /// Mean number of atoms of each species per sample.
    ///
    /// For every species seen in any sample, its occurrences are summed over all
    /// samples and divided by the number of samples.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::EmptyDataSet`] when there are no samples to average over.
    pub fn species_histogram_normalized(&self) -> Result<HashMap<String, f64>, ModelError> {
        if self.samples.is_empty() {
            return Err(ModelError::EmptyDataSet);
        }

        let mut totals: HashMap<String, usize> = HashMap::new();
        for sample in &self.samples {
            for (species, count) in sample.species_histogram() {
                *totals.entry(species).or_insert(0) += count;
            }
        }

        let n_samples = self.samples.len() as f64;
        Ok(totals
            .into_iter()
            .map(|(species, count)| (species, count as f64 / n_samples))
            .collect())
    }

    /// Replaces the contents with a seeded random subset drawn without replacement.
    ///
    /// `count` defaults to one sample. The same seed, input order and count always
    /// produce the same selection. Selected samples are kept in draw order.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::SampleCountExceeded`] if more samples are requested than
    /// the dataset holds. The dataset is left untouched in that case.
    #[instrument(level = "debug", skip(self), fields(available = self.samples.len()))]
    pub fn random_subset(
        &mut self,
        count: Option<usize>,
        seed: u64,
    ) -> Result<&mut Self, ModelError> {
        let requested = count.unwrap_or(1);
        let available = self.samples.len();
        if requested > available {
            return Err(ModelError::SampleCountExceeded {
                requested,
                available,
            });
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let picked = index::sample(&mut rng, available, requested).into_vec();

        let mut pool: Vec<Option<Sample>> = std::mem::take(&mut self.samples)
            .into_iter()
            .map(Some)
            .collect();
        self.samples = picked.into_iter().filter_map(|i| pool[i].take()).collect();

        debug!("Kept {} of {} samples.", self.samples.len(), available);
        Ok(self)
    }

    /// Replaces the contents with the samples at `indices`, in the given order.
    ///
    /// Repeated indices duplicate the corresponding sample.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::IndexOutOfRange`] for the first invalid index. All
    /// indices are checked before anything is replaced.
    pub fn select(&mut self, indices: &[usize]) -> Result<&mut Self, ModelError> {
        let len = self.samples.len();
        let selected = indices
            .iter()
            .map(|&index| {
                self.samples
                    .get(index)
                    .cloned()
                    .ok_or(ModelError::IndexOutOfRange { index, len })
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!("Selected {} samples out of {}.", selected.len(), len);
        self.samples = selected;
        Ok(self)
    }

    /// Removes the samples at `indices`, keeping the rest in their original order.
    ///
    /// Indices that do not refer to a sample are ignored.
    pub fn delete(&mut self, indices: &[usize]) -> &mut Self {
        let to_remove: HashSet<usize> = indices.iter().copied().collect();
        let before = self.samples.len();
        self.samples = std::mem::take(&mut self.samples)
            .into_iter()
            .enumerate()
            .filter(|(index, _)| !to_remove.contains(index))
            .map(|(_, sample)| sample)
            .collect();
        debug!("Deleted {} samples.", before - self.samples.len());
        self
    }
}

impl Extend<Sample> for DataSet {
    fn extend<I: IntoIterator<Item = Sample>>(&mut self, iter: I) {
        self.samples.extend(iter);
    }
}

impl FromIterator<Sample> for DataSet {
    fn from_iter<I: IntoIterator<Item = Sample>>(iter: I) -> Self {
        Self {
            samples: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for DataSet {
    type Item = Sample;
    type IntoIter = std::vec::IntoIter<Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.into_iter()
    }
}

impl<'a> IntoIterator for &'a DataSet {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}
