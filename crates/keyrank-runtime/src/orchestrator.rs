//! Pipeline: runs the four stages over documents.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use keyrank_core::{
    reconcile, CandidateSet, FeatureMap, KeyrankConfig, Result, Stage, TransitionStatistics,
    NEUTRAL,
};
use keyrank_ingest::{
    create_backend, read_document, BackendKind, Document, NlpBackend, Preprocessor,
    SentenceContext, StopWords,
};
use keyrank_score::{
    extract_keyphrases, length_feature, pos_feature, position_feature, rank, select_keywords,
    tfidf_feature, Features, ScoredWord, ScoringWeights,
};
use keyrank_semantic::{compute_density, merge_collocations, RelatednessGraph, Thesaurus};
use keyrank_store::{candidates_text, feature_text, lines, tab_lines, ArtifactStore, CurrentArtifacts};
use tracing::{debug, error, info, warn};

use crate::types::*;

/// Keyword-extraction pipeline. The thesaurus, NLP backend and stop words are
/// loaded once and shared by every document.
pub struct Pipeline {
    config: KeyrankConfig,
    thesaurus: Arc<Thesaurus>,
    nlp: Arc<dyn NlpBackend>,
    stop_words: Arc<StopWords>,
    weights: ScoringWeights,
}

impl Pipeline {
    pub fn new(
        config: KeyrankConfig,
        thesaurus: Arc<Thesaurus>,
        nlp: Arc<dyn NlpBackend>,
        stop_words: Arc<StopWords>,
    ) -> Self {
        Self {
            config,
            thesaurus,
            nlp,
            stop_words,
            weights: ScoringWeights::default(),
        }
    }

    /// Load every resource named by `config`.
    pub fn load(config: KeyrankConfig, backend: BackendKind) -> Result<Self> {
        let paths = &config.dict_paths;
        let thesaurus = Arc::new(Thesaurus::load(&paths.thesaurus));
        let stop_words = Arc::new(StopWords::load(&paths.stop_words));
        let nlp = create_backend(backend, paths)?;

        info!(
            "Pipeline ready: {} thesaurus codes, {} stop words, {} backend",
            thesaurus.len(),
            stop_words.len(),
            nlp.name()
        );
        Ok(Self::new(config, thesaurus, nlp, stop_words))
    }

    pub fn with_weights(mut self, weights: ScoringWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn config(&self) -> &KeyrankConfig {
        &self.config
    }

    pub fn thesaurus(&self) -> &Thesaurus {
        &self.thesaurus
    }

    /// Artifact directory of a document.
    pub fn store_for(&self, path: &Path) -> ArtifactStore {
        ArtifactStore::for_document(path, self.config.output_root.as_deref())
    }

    /// Run every stage on one document.
    pub fn run_document(&self, path: &Path) -> Result<DocumentReport> {
        let doc = read_document(path)?;
        let store = self.store_for(path);
        let hash = doc.content_hash();

        let mut stages = Vec::with_capacity(Stage::all().len());
        for &stage in Stage::all() {
            stages.push(self.execute(stage, &doc, &hash, &store)?);
        }

        let keywords: Vec<ScoredWord> = store.read(Stage::Scoring, "keywords").unwrap_or_default();
        let keyphrases: Vec<ScoredWord> =
            store.read(Stage::Scoring, "keyphrases").unwrap_or_default();

        info!(
            "{}: {} keywords, {} key phrases",
            path.display(),
            keywords.len(),
            keyphrases.len()
        );

        Ok(DocumentReport {
            path: path.to_path_buf(),
            output_dir: store.root().to_path_buf(),
            stages,
            keywords,
            keyphrases,
        })
    }

    /// Run a single stage on one document, reading upstream artifacts from disk.
    pub fn run_stage(&self, stage: Stage, path: &Path) -> Result<StageReport> {
        let doc = read_document(path)?;
        let store = self.store_for(path);
        let hash = doc.content_hash();
        self.execute(stage, &doc, &hash, &store)
    }

    /// Run every document in turn. A failing document is recorded and the
    /// batch carries on.
    pub fn run_batch(&self, paths: &[PathBuf]) -> BatchReport {
        let start = Instant::now();
        let mut report = BatchReport::default();

        for path in paths {
            match self.run_document(path) {
                Ok(doc) => report.documents.push(doc),
                Err(e) => {
                    error!("{}: {}", path.display(), e);
                    report.failures.push(DocumentFailure {
                        path: path.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        report.duration_ms = start.elapsed().as_millis() as u64;
        info!(
            "Batch complete: {} succeeded, {} failed, duration={}ms",
            report.documents.len(),
            report.failures.len(),
            report.duration_ms
        );
        report
    }

    fn execute(&self, stage: Stage, doc: &Document, hash: &str, store: &ArtifactStore) -> Result<StageReport> {
        let start = Instant::now();

        let inputs = store.current(hash);
        let stale: Vec<&str> = stage
            .inputs()
            .iter()
            .filter(|input| !inputs.is_current(**input))
            .map(|input| input.as_str())
            .collect();
        if !stale.is_empty() {
            warn!(
                "{} runs without current output from: {}",
                stage,
                stale.join(", ")
            );
        }
        store.clear_stage(stage)?;

        let (candidate_count, artifacts) = match stage {
            Stage::Preprocess => self.preprocess(doc, store)?,
            Stage::Semantic => self.semantic(&inputs, store)?,
            Stage::Statistical => self.statistical(doc, &inputs, store)?,
            Stage::Scoring => self.scoring(doc, &inputs, store)?,
        };

        store.mark_complete(stage, hash, &artifacts)?;

        let report = StageReport {
            stage,
            candidate_count,
            artifacts: artifacts.iter().map(|a| a.to_string()).collect(),
            duration_ms: start.elapsed().as_millis() as u64,
        };
        debug!(
            "{} stage: {} candidates, duration={}ms",
            stage, report.candidate_count, report.duration_ms
        );
        Ok(report)
    }

    fn preprocess(&self, doc: &Document, store: &ArtifactStore) -> Result<(usize, Vec<&'static str>)> {
        let output = Preprocessor::new(self.nlp.as_ref(), &self.stop_words).run(doc);
        let sentences = &output.sentences;

        store.write(
            Stage::Preprocess,
            "candidates",
            &output.candidates,
            &candidates_text(&output.candidates),
        )?;
        store.write(
            Stage::Preprocess,
            "sentences",
            sentences,
            &tab_lines([
                ("title", &sentences.title),
                ("first", &sentences.first),
                ("last", &sentences.last),
            ]),
        )?;
        store.write(
            Stage::Preprocess,
            "transitions",
            &output.transitions,
            &transitions_text(&output.transitions),
        )?;

        Ok((output.candidates.len(), vec!["candidates", "sentences", "transitions"]))
    }

    fn semantic(&self, inputs: &CurrentArtifacts, store: &ArtifactStore) -> Result<(usize, Vec<&'static str>)> {
        let mut candidates = inputs.read_candidates(Stage::Preprocess, "candidates");
        let transitions: TransitionStatistics =
            inputs.read(Stage::Preprocess, "transitions").unwrap_or_default();

        let graph = RelatednessGraph::build(&candidates, &self.thesaurus);
        let mut density = compute_density(&graph, &candidates);
        let compounds = merge_collocations(&mut density, &mut candidates, &transitions);
        if !compounds.is_empty() {
            debug!("Merged compounds: {:?}", compounds);
        }

        let stats = graph.stats();
        info!(
            "Semantic stage: {} nodes, {} edges, {} unresolved, {} compounds",
            stats.node_count,
            stats.edge_count,
            stats.unresolved_count,
            compounds.len()
        );

        store.write(Stage::Semantic, "density", &density, &feature_text(&density))?;
        store.write(Stage::Semantic, "candidates", &candidates, &candidates_text(&candidates))?;
        store.write(
            Stage::Semantic,
            "unresolved",
            &graph.unresolved(),
            &lines(graph.unresolved()),
        )?;

        Ok((candidates.len(), vec!["density", "candidates", "unresolved"]))
    }

    fn statistical(
        &self,
        doc: &Document,
        inputs: &CurrentArtifacts,
        store: &ArtifactStore,
    ) -> Result<(usize, Vec<&'static str>)> {
        let candidates = merged_candidates(inputs);
        let density = inputs.read_feature_map(Stage::Semantic, "density");
        let sentences: SentenceContext = inputs.read(Stage::Preprocess, "sentences").unwrap_or_default();

        let tfidf = tfidf_feature(self.nlp.as_ref(), &doc.full_text(), &candidates);
        let position = position_feature(&density, &candidates, &sentences);
        let pos = pos_feature(&candidates);
        let length = length_feature(&candidates);

        store.write(Stage::Statistical, "tfidf", &tfidf, &feature_text(&tfidf))?;
        store.write(Stage::Statistical, "position", &position, &feature_text(&position))?;
        store.write(Stage::Statistical, "pos_weight", &pos, &feature_text(&pos))?;
        store.write(Stage::Statistical, "length", &length, &feature_text(&length))?;

        Ok((candidates.len(), vec!["tfidf", "position", "pos_weight", "length"]))
    }

    fn scoring(
        &self,
        doc: &Document,
        inputs: &CurrentArtifacts,
        store: &ArtifactStore,
    ) -> Result<(usize, Vec<&'static str>)> {
        let candidates = merged_candidates(inputs);
        let features = Features {
            density: reconciled(&candidates, inputs, Stage::Semantic, "density"),
            tfidf: reconciled(&candidates, inputs, Stage::Statistical, "tfidf"),
            position: reconciled(&candidates, inputs, Stage::Statistical, "position"),
            pos: reconciled(&candidates, inputs, Stage::Statistical, "pos_weight"),
        };

        let ranked = rank(&candidates, &features, &self.weights);
        let keywords = select_keywords(&ranked, self.config.score_floor, self.config.top_k);
        let keyphrases = extract_keyphrases(&keywords, self.nlp.as_ref(), &doc.body);

        let scores: FeatureMap = ranked.iter().map(|w| (w.word.clone(), w.score)).collect();
        store.write(Stage::Scoring, "score", &scores, &scored_text(&ranked))?;
        store.write(Stage::Scoring, "keywords", &keywords, &scored_text(&keywords))?;
        store.write(Stage::Scoring, "keyphrases", &keyphrases, &scored_text(&keyphrases))?;

        info!(
            "Scoring stage: {} candidates, {} keywords, {} key phrases",
            candidates.len(),
            keywords.len(),
            keyphrases.len()
        );
        Ok((candidates.len(), vec!["score", "keywords", "keyphrases"]))
    }
}

/// Candidates including compounds, falling back to the preprocess list when
/// the semantic stage left nothing behind.
fn merged_candidates(inputs: &CurrentArtifacts) -> CandidateSet {
    let merged = inputs.read_candidates(Stage::Semantic, "candidates");
    if !merged.is_empty() {
        return merged;
    }
    warn!("No semantic candidates, falling back to preprocess output");
    inputs.read_candidates(Stage::Preprocess, "candidates")
}

fn reconciled(candidates: &CandidateSet, inputs: &CurrentArtifacts, stage: Stage, name: &str) -> FeatureMap {
    let raw = inputs.read_feature_map(stage, name);
    let (map, dropped) = reconcile(candidates, &raw, NEUTRAL);
    if dropped > 0 {
        warn!("Dropped {} unknown words from {}/{}", dropped, stage, name);
    }
    let missing = candidates.words().filter(|w| !raw.contains_key(*w)).count();
    if missing > 0 {
        debug!("Back-filled {} missing {}/{} values", missing, stage, name);
    }
    map
}

fn transitions_text(transitions: &TransitionStatistics) -> String {
    let mut out = String::new();
    for (first, successors) in &transitions.next {
        for (second, count) in successors {
            out.push_str(&format!("{}\t{}\t{}\n", first, second, count));
        }
    }
    out
}

fn scored_text(words: &[ScoredWord]) -> String {
    tab_lines(words.iter().map(|w| (&w.word, format!("{:.6}", w.score))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyrank_ingest::PretaggedBackend;

    fn pipeline(dir: &Path) -> Pipeline {
        let config = KeyrankConfig::new(dir.join("dict"));
        Pipeline::new(
            config,
            Arc::new(Thesaurus::parse("Aa01A01= 网络 网路\nAa01A02= 模型\n")),
            Arc::new(PretaggedBackend::new()),
            Arc::new(StopWords::builtin()),
        )
    }

    #[test]
    fn test_transitions_text() {
        let mut t = TransitionStatistics::new();
        t.record("神经", "网络");
        t.record("神经", "网络");
        assert_eq!(transitions_text(&t), "神经\t网络\t2\n");
    }

    #[test]
    fn test_scored_text() {
        let text = scored_text(&[ScoredWord::new("网络", 0.5)]);
        assert_eq!(text, "网络\t0.500000\n");
    }

    #[test]
    fn test_stage_writes_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let doc_path = dir.path().join("doc.txt");
        std::fs::write(&doc_path, "网络/n 模型/n\n网络/n 模型/n 。\n").unwrap();

        let pipeline = pipeline(dir.path());
        let report = pipeline.run_stage(Stage::Preprocess, &doc_path).unwrap();
        assert_eq!(report.candidate_count, 2);
        assert_eq!(report.artifacts, vec!["candidates", "sentences", "transitions"]);

        let store = pipeline.store_for(&doc_path);
        let hash = read_document(&doc_path).unwrap().content_hash();
        assert!(store.is_complete(Stage::Preprocess, &hash));
        assert!(!store.is_complete(Stage::Semantic, &hash));
    }

    #[test]
    fn test_missing_document_fails() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = pipeline(dir.path());
        assert!(pipeline.run_document(&dir.path().join("absent.txt")).is_err());
    }
}
