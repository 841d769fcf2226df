//! Current selection and address-fragment routing.
//!
//! The page keeps no mutable navigation state: every event computes a new
//! [`Selection`] from the dataset and the previous one, and the page is
//! re-rendered from it. The fragment (`#paper=...&artifact=...`) mirrors the
//! selection so links and reloads land on the same artifact.

use crate::dataset::{Artifact, Dataset, Paper, Query};
use tracing::debug;
use url::form_urlencoded;

/// Paper and artifact ids requested by an address fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FragmentParams {
    pub paper: Option<String>,
    pub artifact: Option<String>,
}

impl FragmentParams {
    /// Parse a form-urlencoded fragment. A leading `#` is ignored, as are
    /// unknown keys; the last occurrence of a key wins.
    pub fn parse(fragment: &str) -> Self {
        let payload = fragment.strip_prefix('#').unwrap_or(fragment);
        let mut params = Self::default();

        for (key, value) in form_urlencoded::parse(payload.as_bytes()) {
            match key.as_ref() {
                "paper" => params.paper = Some(value.into_owned()),
                "artifact" => params.artifact = Some(value.into_owned()),
                _ => {}
            }
        }

        params
    }
}

/// Indices of the selected paper, artifact and query.
///
/// A selection is only meaningful for the dataset it was resolved against.
/// The artifact index may be out of range when the paper has no artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    paper: usize,
    artifact: usize,
    query: usize,
}

impl Selection {
    /// The first artifact of the first paper, or `None` for an empty dataset.
    pub fn first(dataset: &Dataset) -> Option<Self> {
        Self::at(dataset, 0, 0)
    }

    /// Select a paper by index, starting at its first artifact.
    pub fn at_paper(dataset: &Dataset, paper: usize) -> Option<Self> {
        Self::at(dataset, paper, 0)
    }

    fn at(dataset: &Dataset, paper: usize, artifact: usize) -> Option<Self> {
        dataset.paper(paper).map(|_| Self {
            paper,
            artifact,
            query: 0,
        })
    }

    /// Resolve requested ids against the dataset.
    ///
    /// An unknown paper falls back to `default_paper`, then to the first
    /// paper. An unknown artifact falls back to the paper's first artifact.
    pub fn resolve(
        dataset: &Dataset,
        params: &FragmentParams,
        default_paper: Option<&str>,
    ) -> Option<Self> {
        let requested = params.paper.as_deref().and_then(|id| dataset.position(id));
        if let (None, Some(id)) = (requested, params.paper.as_deref()) {
            debug!(paper = id, "Paper not found, using fallback");
        }

        let paper = requested
            .or_else(|| default_paper.and_then(|id| dataset.position(id)))
            .unwrap_or(0);
        let paper_ref = dataset.paper(paper)?;

        let artifact = match params.artifact.as_deref() {
            Some(id) => paper_ref.artifact_position(id).unwrap_or_else(|| {
                debug!(paper = %paper_ref.id, artifact = id, "Artifact not found, using first");
                0
            }),
            None => 0,
        };

        Self::at(dataset, paper, artifact)
    }

    /// Resolve a raw address fragment.
    pub fn from_fragment(
        dataset: &Dataset,
        fragment: &str,
        default_paper: Option<&str>,
    ) -> Option<Self> {
        Self::resolve(dataset, &FragmentParams::parse(fragment), default_paper)
    }

    /// Select another artifact of the current paper.
    pub fn with_artifact(self, dataset: &Dataset, artifact: usize) -> Option<Self> {
        let paper = self.paper(dataset)?;
        (artifact < paper.artifacts.len()).then_some(Self {
            artifact,
            query: 0,
            ..self
        })
    }

    /// Select another query of the current artifact.
    pub fn with_query(self, dataset: &Dataset, query: usize) -> Option<Self> {
        let artifact = self.artifact(dataset)?;
        (query < artifact.queries.len()).then_some(Self { query, ..self })
    }

    /// The next artifact, continuing into the following papers.
    ///
    /// `None` when this is the last artifact of the dataset.
    pub fn next(self, dataset: &Dataset) -> Option<Self> {
        let paper = self.paper(dataset)?;
        if self.artifact + 1 < paper.artifacts.len() {
            return self.with_artifact(dataset, self.artifact + 1);
        }

        (self.paper + 1..dataset.len())
            .find(|&i| dataset.paper(i).is_some_and(|p| !p.artifacts.is_empty()))
            .and_then(|i| Self::at(dataset, i, 0))
    }

    /// The previous artifact, continuing into the preceding papers.
    ///
    /// `None` when this is the first artifact of the dataset.
    pub fn prev(self, dataset: &Dataset) -> Option<Self> {
        self.paper(dataset)?;
        if self.artifact > 0 {
            return self.with_artifact(dataset, self.artifact - 1);
        }

        (0..self.paper)
            .rev()
            .find_map(|i| {
                let count = dataset.paper(i)?.artifacts.len();
                (count > 0).then_some((i, count - 1))
            })
            .and_then(|(i, last)| Self::at(dataset, i, last))
    }

    pub fn paper_index(&self) -> usize {
        self.paper
    }

    pub fn artifact_index(&self) -> usize {
        self.artifact
    }

    pub fn query_index(&self) -> usize {
        self.query
    }

    pub fn paper<'a>(&self, dataset: &'a Dataset) -> Option<&'a Paper> {
        dataset.paper(self.paper)
    }

    pub fn artifact<'a>(&self, dataset: &'a Dataset) -> Option<&'a Artifact> {
        self.paper(dataset)?.artifacts.get(self.artifact)
    }

    pub fn query<'a>(&self, dataset: &'a Dataset) -> Option<&'a Query> {
        self.artifact(dataset)?.queries.get(self.query)
    }

    /// Encode the selection as an address fragment, without the leading `#`.
    ///
    /// The artifact key is omitted when the paper has no artifacts.
    pub fn to_fragment(&self, dataset: &Dataset) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        if let Some(paper) = self.paper(dataset) {
            serializer.append_pair("paper", &paper.id);
        }
        if let Some(artifact) = self.artifact(dataset) {
            serializer.append_pair("artifact", &artifact.id);
        }
        serializer.finish()
    }
}
