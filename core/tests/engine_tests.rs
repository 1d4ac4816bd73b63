use std::io::{Cursor, Write};

use tempfile::NamedTempFile;
use vsm_core::{Boosts, EngineConfig, Field, IdfVariant, SearchEngine, VsmError};

const TWO_DOCS: &str = "\
.I 1
.T
the gas turbine engine
.A
whittle,f.
.B
j. ae. scs. 1, 1950
.W
compressor blades for a gas turbine
.I 2
.T
aircraft wing design
.A
smith,j.
.B
aero quarterly 3, 1952
.W
the lift distribution of a swept wing
";

const CORPUS: &str = "\
.I 1
.T
experimental investigation of the aerodynamics of a wing in a slipstream
.A
brenckmann,m.
.B
j. ae. scs. 25, 1958, 324.
.W
an experimental study of a wing in a propeller slipstream was made
in order to determine the spanwise distribution of the lift increase
due to slipstream at different angles of attack of the wing
.I 2
.T
simple shear flow past a flat plate in an incompressible fluid of small viscosity
.A
ting-yili
.B
department of aeronautical engineering, rensselaer polytechnic institute
.W
in the study of high-speed viscous flow past a two-dimensional body
it is usually necessary to consider a curved shock wave
.I 3
.T
the boundary layer in simple shear flow past a flat plate
.A
m. b. glauert
.B
department of mathematics, university of manchester
.W
the boundary-layer equations are presented for steady incompressible flow
with no pressure gradient
.I 4
.T
approximate solutions of the incompressible laminar boundary layer equations
.A
mirels,h.
.B
naca tn 3415
.W
approximate integral techniques for the incompressible boundary layer
";

fn engine_with(corpus: &str) -> SearchEngine {
    let mut engine = SearchEngine::new();
    engine.load_corpus(Cursor::new(corpus)).unwrap();
    engine
}

#[test]
fn title_only_search_ranks_matching_document() {
    let mut engine = engine_with(TWO_DOCS);
    let title = engine.weights().field(Field::Title);
    assert!(title.weight(1, "turbin") > 0.0);
    assert!(title.weight(1, "engin") > 0.0);
    assert_eq!(title.weight(2, "turbin"), 0.0);

    let results = engine.search("turbine engine", Boosts::title_only()).to_vec();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].document_id, 1);
    assert!(results[0].score > 0.0);
}

#[test]
fn abstract_contributes_nothing_under_title_only_boost() {
    let mut engine = engine_with(TWO_DOCS);
    // "compressor" and "lift" occur only in abstracts
    assert!(engine.search("compressor lift", Boosts::title_only()).is_empty());
    assert_eq!(engine.search("compressor lift", Boosts::abstract_only()).len(), 2);
}

#[test]
fn title_only_score_equals_title_cosine() {
    let mut engine = engine_with(CORPUS);
    let scorer = engine.scorer();
    let query = scorer.query_vector("boundary layer flow");
    let expected = scorer.similarity(&query, 3, Field::Title);
    let results = engine.search("boundary layer flow", Boosts::title_only()).to_vec();
    let doc3 = results.iter().find(|r| r.document_id == 3).unwrap();
    assert_eq!(doc3.score, expected);
}

#[test]
fn query_without_overlap_is_empty() {
    let mut engine = engine_with(CORPUS);
    assert!(engine.scorer().query_vector("the of and").is_empty());
    assert!(!engine.scorer().query_vector("helicopter rotor noise").is_empty());
    assert!(engine.search("helicopter rotor noise", Boosts::default()).is_empty());
    assert!(engine.search("the of and", Boosts::default()).is_empty());
    assert!(engine.search("", Boosts::default()).is_empty());
}

#[test]
fn results_are_ordered_and_bounded() {
    let mut engine = engine_with(CORPUS);
    let results = engine.search("incompressible boundary layer flow", Boosts::new(0.7, 0.3).unwrap()).to_vec();
    assert!(!results.is_empty());
    for pair in results.windows(2) {
        assert!(pair[0].score > pair[1].score || (pair[0].score == pair[1].score && pair[0].document_id < pair[1].document_id));
    }
    assert!(results.iter().all(|r| r.score > 0.0));
    assert!(engine.top_k(2).len() <= 2);
    assert!(engine.top_k(100).len() <= results.len());
}

#[test]
fn document_frequency_matches_distinct_documents() {
    let engine = engine_with(CORPUS);
    for field in Field::ALL {
        let table = engine.frequencies().field(field);
        for (term, postings) in table.iter() {
            let distinct = engine.documents().filter(|d| table.count(term, d.id) > 0).count();
            assert_eq!(table.document_frequency(term), distinct);
            assert_eq!(postings.len(), distinct);
        }
    }
}

#[test]
fn reweighting_is_idempotent() {
    let mut engine = engine_with(CORPUS);
    let before = engine.weights().clone();
    engine.reweight();
    assert_eq!(&before, engine.weights());
}

#[test]
fn building_twice_from_a_file_gives_identical_tables() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(CORPUS.as_bytes()).unwrap();

    let mut first = SearchEngine::new();
    first.build_index(file.path()).unwrap();
    let mut second = SearchEngine::new();
    second.build_index(file.path()).unwrap();
    assert_eq!(first.frequencies(), second.frequencies());
    assert_eq!(first.weights(), second.weights());

    // rebuilding in place replaces rather than accumulates
    let stats = first.build_index(file.path()).unwrap();
    assert_eq!(stats.documents, 4);
    assert_eq!(first.frequencies(), second.frequencies());
}

#[test]
fn missing_collection_is_an_ingestion_error() {
    let mut engine = SearchEngine::new();
    let err = engine.build_index("/definitely/not/here/cran.all").unwrap_err();
    assert!(matches!(err, VsmError::Ingestion { .. }));
    assert!(err.is_fatal());
}

#[test]
fn invalid_boosts_are_rejected() {
    assert!(matches!(Boosts::new(0.6, 0.5), Err(VsmError::InvalidBoost { .. })));
}

#[test]
fn titles_and_queries_are_looked_up() {
    let mut engine = engine_with(CORPUS);
    engine.load_queries(Cursor::new(".I 001\n.W\nboundary layer of a flat plate\n")).unwrap();
    assert_eq!(engine.get_title(3), Some("the boundary layer in simple shear flow past a flat plate"));
    assert_eq!(engine.get_title(99), None);

    let results = engine.search_query("1", Boosts::default()).unwrap().to_vec();
    assert_eq!(results[0].document_id, 3);
}

#[test]
fn smoothed_idf_keeps_ubiquitous_terms() {
    let corpus = ".I 1\n.T\nwing flow\n.W\n.I 2\n.T\nwing\n.W\n";
    let mut standard = engine_with(corpus);
    assert!(standard.search("wing", Boosts::title_only()).is_empty());

    let mut smoothed = SearchEngine::with_config(EngineConfig { idf: IdfVariant::Smoothed });
    smoothed.load_corpus(Cursor::new(corpus)).unwrap();
    assert_eq!(smoothed.search("wing", Boosts::title_only()).len(), 2);
}

#[test]
fn duplicate_document_ids_keep_last_title() {
    let engine = engine_with(".I 1\n.T\nfirst\n.W\n.I 1\n.T\nsecond\n.W\n");
    assert_eq!(engine.num_documents(), 1);
    assert_eq!(engine.get_title(1), Some("second"));
}
