use assert_cmd::Command;
use ferritin_test_data::TestFile;
use safetensors::SafeTensors;

const QUERY_LENGTH: usize = 30;

#[test]
fn test_cli_command_msa() {
    let (msa_file, _tmp) = TestFile::msa_01().create_temp().unwrap();
    let out_dir = tempfile::tempdir().unwrap();
    let output = out_dir.path().join("features.safetensors");

    let mut cmd = Command::cargo_bin("ferritin-featurizers").unwrap();
    cmd.arg("msa")
        .arg("--input")
        .arg(&msa_file)
        .arg("--output")
        .arg(&output);
    cmd.assert().success();

    let bytes = std::fs::read(&output).unwrap();
    let tensors = SafeTensors::deserialize(&bytes).unwrap();
    for name in [
        "sequence_matrix",
        "weights",
        "one_hot",
        "deletion_probability",
        "profile",
        "profile_prior",
        "profile_2d",
        "mutual_information",
        "static_features",
        "gap_matrix",
        "contact_potential",
    ] {
        assert!(tensors.tensor(name).is_ok(), "missing tensor {name}");
    }
    // the all-gap record is filtered out
    assert_eq!(tensors.tensor("sequence_matrix").unwrap().shape(), &[9, QUERY_LENGTH]);
    assert_eq!(
        tensors.tensor("profile_2d").unwrap().shape(),
        &[QUERY_LENGTH, QUERY_LENGTH, 22, 22]
    );
}

#[test]
fn test_cli_command_msa_flags() {
    let (msa_file, _tmp) = TestFile::msa_01().create_temp().unwrap();
    let out_dir = tempfile::tempdir().unwrap();
    let output = out_dir.path().join("features.safetensors");

    let mut cmd = Command::cargo_bin("ferritin-featurizers").unwrap();
    cmd.arg("msa")
        .arg("--input")
        .arg(&msa_file)
        .arg("--output")
        .arg(&output)
        .arg("--no-filter")
        .arg("--no-gaps");
    cmd.assert().success();

    let bytes = std::fs::read(&output).unwrap();
    let tensors = SafeTensors::deserialize(&bytes).unwrap();
    assert_eq!(tensors.tensor("sequence_matrix").unwrap().shape(), &[10, QUERY_LENGTH]);
    assert_eq!(tensors.tensor("profile").unwrap().shape(), &[QUERY_LENGTH, 21]);
}

#[test]
fn test_cli_command_msa_malformed() {
    let (msa_file, _tmp) = TestFile::msa_malformed().create_temp().unwrap();
    let out_dir = tempfile::tempdir().unwrap();
    let output = out_dir.path().join("features.safetensors");

    let mut cmd = Command::cargo_bin("ferritin-featurizers").unwrap();
    cmd.arg("msa")
        .arg("--input")
        .arg(&msa_file)
        .arg("--output")
        .arg(&output);
    cmd.assert().failure();
    assert!(!output.exists());
}

#[test]
fn test_cli_command_tables_roundtrip() {
    let out_dir = tempfile::tempdir().unwrap();
    let tables = out_dir.path().join("tables.json");

    let mut cmd = Command::cargo_bin("ferritin-featurizers").unwrap();
    cmd.arg("tables").arg("--output").arg(&tables);
    cmd.assert().success();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&tables).unwrap()).unwrap();
    assert_eq!(json["background"].as_array().unwrap().len(), 22);

    // the dumped tables are accepted back as input
    let (msa_file, _tmp) = TestFile::msa_01().create_temp().unwrap();
    let output = out_dir.path().join("features.safetensors");
    let mut cmd = Command::cargo_bin("ferritin-featurizers").unwrap();
    cmd.arg("msa")
        .arg("--input")
        .arg(&msa_file)
        .arg("--output")
        .arg(&output)
        .arg("--tables")
        .arg(&tables);
    cmd.assert().success();
}

#[test]
fn test_cli_command_msa_config() {
    let (msa_file, _tmp) = TestFile::msa_01().create_temp().unwrap();
    let out_dir = tempfile::tempdir().unwrap();
    let config = out_dir.path().join("config.json");
    std::fs::write(&config, r#"{"filter": false, "prior": {"beta": 4.0}}"#).unwrap();
    let output = out_dir.path().join("features.safetensors");

    let mut cmd = Command::cargo_bin("ferritin-featurizers").unwrap();
    cmd.arg("msa")
        .arg("--input")
        .arg(&msa_file)
        .arg("--output")
        .arg(&output)
        .arg("--config")
        .arg(&config);
    cmd.assert().success();

    let bytes = std::fs::read(&output).unwrap();
    let tensors = SafeTensors::deserialize(&bytes).unwrap();
    assert_eq!(tensors.tensor("sequence_matrix").unwrap().shape(), &[10, QUERY_LENGTH]);
}
