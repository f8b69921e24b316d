use std::fs;
use std::path::Path;

use degree_trend::pipeline::{analyze_dir, write_matrices};
use degree_trend::sink;
use degree_trend::trend::{rank_tissue, RankOptions};
use degree_trend::{AgeGroups, CorpusConfig};

fn write_unit(base: &Path, age: u16, file: &str, body: &str) {
    let dir = base.join(age.to_string());
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(file), body).unwrap();
}

#[test]
fn build_and_rank_from_a_directory_layout() {
    let input = tempfile::tempdir().unwrap();
    let base = input.path();

    write_unit(base, 20, "brain_20.csv", "GeneA,GeneB\nA,B\n");
    write_unit(base, 30, "brain_30.csv", "GeneA,GeneB\nA,B\nC,B\n,B\n");
    write_unit(base, 40, "liver_40.csv", "GeneA,GeneB\nA,C\n");
    write_unit(base, 40, "broken_40.csv", "only,one\nx,y\n");
    write_unit(base, 50, "readme.txt", "not an edge list");
    // 60 and 70 are missing entirely

    let config = CorpusConfig::new();
    let analysis = analyze_dir(base, &config);

    assert_eq!(analysis.vocabulary.to_vec(), vec!["A", "B", "C"]);
    assert_eq!(analysis.report.units_read, 3);
    assert_eq!(analysis.report.malformed_edges(), 1);
    assert_eq!(analysis.report.unreadable_units(), 1);
    assert_eq!(analysis.report.missing_folders(), 2);

    let dm = &analysis.degree_matrix;
    let keys: Vec<(u16, &str)> = dm.rows.iter().map(|r| (r.age, r.tissue.as_str())).collect();
    assert_eq!(keys, vec![(20, "brain"), (30, "brain"), (40, "liver")]);
    assert_eq!(dm.cell(30, "brain", "B"), Some(2));
    assert_eq!(dm.cell(40, "liver", "C"), Some(1));

    let cm = &analysis.change_matrix;
    let b: Vec<i8> = cm.row("brain", "B").unwrap().changes.iter().map(|c| c.value()).collect();
    assert_eq!(b, vec![1, -1, 0, 0, 0]);
    let c: Vec<i8> = cm.row("liver", "C").unwrap().changes.iter().map(|c| c.value()).collect();
    assert_eq!(c, vec![0, 1, -1, 0, 0]);

    let output = tempfile::tempdir().unwrap();
    let degree_out = output.path().join("out").join("degree.csv");
    let change_out = output.path().join("out").join("changes.csv");
    write_matrices(&analysis, &degree_out, &change_out).unwrap();

    let degree_csv = fs::read_to_string(&degree_out).unwrap();
    assert_eq!(
        degree_csv,
        "AgeGroup,Tissue,A,B,C\n20,brain,0,1,0\n30,brain,0,2,0\n40,liver,0,0,1\n"
    );

    let change_csv = fs::read_to_string(&change_out).unwrap();
    assert!(change_csv.starts_with(
        "Tissue,Gene,Change_20_to_30,Change_30_to_40,Change_40_to_50,Change_50_to_60,Change_60_to_70\n"
    ));
    assert_eq!(change_csv.lines().count(), 1 + 2 * 3);

    let back = sink::read_change_matrix(fs::File::open(&change_out).unwrap()).unwrap();
    assert_eq!(&back, cm);

    let ranked = rank_tissue(&back, "liver", RankOptions::default());
    let genes: Vec<&str> = ranked.iter().map(|g| g.gene.as_str()).collect();
    // every liver trajectory nets to zero; ties fall back to gene name
    assert_eq!(genes, vec!["A", "B", "C"]);
    assert!(ranked.iter().all(|g| g.score == 0.0));
}

#[test]
fn custom_lifecycle_and_columns() {
    let input = tempfile::tempdir().unwrap();
    let base = input.path();

    write_unit(base, 1, "gut_1.csv", "from,to\nX,Y\n");
    write_unit(base, 2, "gut_2.csv", "from,to\nX,Y\nZ,Y\n");
    write_unit(base, 3, "gut_3.csv", "from,to\nX,Y\nZ,Y\nX,Y\n");

    let config = CorpusConfig::new()
        .age_groups(AgeGroups::new(vec![1, 2, 3]).unwrap())
        .source_column("from")
        .target_column("to");
    let analysis = analyze_dir(base, &config);

    assert!(analysis.report.is_clean());
    assert_eq!(analysis.change_matrix.transition_count(), 2);

    let ranked = rank_tissue(&analysis.change_matrix, "gut", RankOptions { nonzero_only: true });
    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].gene, "Y");
    assert_eq!(ranked[0].score, 1.0);
}
