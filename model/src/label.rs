/// Bijection between language labels and dense class indices.
///
/// Classes keep the enumeration order they were fitted with, so index `i`
/// always refers to the same network output column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    pub fn fit<S: AsRef<str>>(classes: &[S]) -> anyhow::Result<Self> {
        anyhow::ensure!(!classes.is_empty(), "Label vocabulary is empty");

        let classes: Vec<String> = classes.iter().map(|s| s.as_ref().to_owned()).collect();

        for (idx, class) in classes.iter().enumerate() {
            anyhow::ensure!(!class.is_empty(), "Empty label at position {idx}");
            anyhow::ensure!(
                !classes[..idx].contains(class),
                "Duplicate label in vocabulary: {class}"
            );
        }

        Ok(Self { classes })
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn transform(&self, label: &str) -> anyhow::Result<i64> {
        self.classes
            .iter()
            .position(|class| class == label)
            .map(|idx| idx as i64)
            .ok_or_else(|| anyhow::anyhow!("Unknown label: {label}"))
    }

    pub fn transform_all<S: AsRef<str>>(&self, labels: &[S]) -> anyhow::Result<Vec<i64>> {
        labels
            .iter()
            .map(|label| self.transform(label.as_ref()))
            .collect()
    }

    pub fn inverse(&self, index: i64) -> anyhow::Result<&str> {
        usize::try_from(index)
            .ok()
            .and_then(|idx| self.classes.get(idx))
            .map(String::as_str)
            .ok_or_else(|| {
                anyhow::anyhow!("Class index {index} out of range 0..{}", self.classes.len())
            })
    }

    pub fn inverse_all(&self, indices: &[i64]) -> anyhow::Result<Vec<&str>> {
        indices.iter().map(|&index| self.inverse(index)).collect()
    }
}
