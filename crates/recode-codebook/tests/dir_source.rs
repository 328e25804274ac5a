use std::fs;

use recode_codebook::{DirSource, ProtocolRegistry, TerminologySource, WarnDedupe};
use recode_model::OutputFormat;

const INDEX_XML: &str = r#"
<return>
  <project prefix="ppcolbio-">
    <dataset versionLabel="33" id="ds-33">
      <desc language="nl-NL">Colonbiopt</desc>
    </dataset>
  </project>
</return>
"#;

const DATASET_XML: &str = r#"
<dataset>
  <concept id="con-1" statusCode="final">
    <property name="PALGA_COLNAME">colonbiopt</property>
    <valueSet>
      <conceptList>
        <concept code="C1" codeSystemName="SNOMED CT" displayName="Adenoma">
          <designation type="preferred" displayName="adenoma"/>
        </concept>
      </conceptList>
    </valueSet>
    <terminologyAssociation conceptId="con-1" code="C100" codeSystemName="SNOMED CT" displayName="Colon biopt"/>
  </concept>
</dataset>
"#;

#[test]
fn serves_index_and_snapshots_from_a_directory() {
    let dir = tempfile::tempdir().expect("temp dir");
    fs::write(dir.path().join("ppcolbio-index.xml"), INDEX_XML).expect("write index");
    fs::write(dir.path().join("ds-33-nl-NL.xml"), DATASET_XML).expect("write dataset");

    let source = DirSource::new(dir.path());
    let index = source.project_index("ppcolbio-").expect("index");
    assert_eq!(index.len(), 1);
    assert_eq!(index[0].dataset_id, "ds-33");

    let registry =
        ProtocolRegistry::discover("ppcolbio-", "nl-NL", Box::new(source), WarnDedupe::new())
            .expect("discover");
    assert!(registry.contains_header("colonbiopt", "33"));
    assert_eq!(
        registry.translate_value("colonbiopt", "adenoma", "33", OutputFormat::Descriptions),
        "Adenoma"
    );
}

#[test]
fn missing_index_file_reports_read_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let source = DirSource::new(dir.path());
    assert!(source.project_index("ppcolbio-").is_err());
}
