use std::fmt;

use model::LabelEncoder;

/// Counts of (true language, predicted language) pairs, rows and columns in
/// the encoder's fitted class order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfusionMatrix {
    classes: Vec<String>,
    counts: Vec<Vec<usize>>,
}

impl ConfusionMatrix {
    pub fn from_indices(
        encoder: &LabelEncoder,
        actual: &[i64],
        predicted: &[i64],
    ) -> anyhow::Result<Self> {
        anyhow::ensure!(
            actual.len() == predicted.len(),
            "Label count mismatch: {} actual vs {} predicted",
            actual.len(),
            predicted.len()
        );

        let mut counts = vec![vec![0; encoder.len()]; encoder.len()];
        for (&truth, &guess) in actual.iter().zip(predicted) {
            // inverse() validates the index range.
            encoder.inverse(truth)?;
            encoder.inverse(guess)?;
            counts[truth as usize][guess as usize] += 1;
        }

        Ok(Self {
            classes: encoder.classes().to_vec(),
            counts,
        })
    }

    pub fn counts(&self) -> &[Vec<usize>] {
        &self.counts
    }

    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    pub fn correct(&self) -> usize {
        self.counts
            .iter()
            .enumerate()
            .map(|(index, row)| row[index])
            .sum()
    }

    pub fn accuracy(&self) -> Option<f64> {
        match self.total() {
            0 => None,
            total => Some(self.correct() as f64 / total as f64),
        }
    }

    /// Per-language recall: correct predictions over all samples of that
    /// language. `None` for languages absent from the data.
    pub fn per_class_accuracy(&self) -> Vec<(&str, Option<f64>)> {
        self.classes
            .iter()
            .zip(&self.counts)
            .enumerate()
            .map(|(index, (class, row))| {
                let total: usize = row.iter().sum();
                let accuracy = match total {
                    0 => None,
                    total => Some(row[index] as f64 / total as f64),
                };
                (class.as_str(), accuracy)
            })
            .collect()
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .classes
            .iter()
            .map(String::len)
            .chain(self.counts.iter().flatten().map(|count| count.to_string().len()))
            .max()
            .unwrap_or(1)
            + 2;

        write!(f, "{:>width$}", "")?;
        for class in &self.classes {
            write!(f, "{class:>width$}")?;
        }
        writeln!(f)?;

        for (class, row) in self.classes.iter().zip(&self.counts) {
            write!(f, "{class:>width$}")?;
            for count in row {
                write!(f, "{count:>width$}")?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}
