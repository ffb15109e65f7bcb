//! End-to-end: parse a policy document and deploy it against the in-memory
//! catalog.

use std::sync::Arc;

use lakegov_catalog::{InMemoryCatalog, Resource};
use lakegov_policy::{PolicyConfig, PolicyDeployer};

const POLICY_DOC: &str = r#"
databases:
  - name: student_db
    description: Curated student records
    location: s3://data-lake/curated/
    permissions:
      - role: data_engineer
        access: "SELECT,ALTER"
tables:
  - database: student_db
    name: student_records
    columns:
      - name: ssn
        access:
          - role: registrar
            level: full
      - name: gpa
        access:
          - role: analyst
row_filters:
  - name: active_only
    table: student_records
    filter_expression: "enrollment_status = 'ACTIVE'"
    roles: [analyst]
column_filters:
  - table: student_records
    columns: [ssn]
    roles: [analyst]
settings:
  default_database: student_db
"#;

#[tokio::test]
async fn deploys_a_full_document_in_declared_order() {
    let config = PolicyConfig::from_yaml(POLICY_DOC).unwrap();
    let catalog = Arc::new(InMemoryCatalog::default());
    let deployer = PolicyDeployer::new(catalog.clone());

    let summary = deployer.deploy(&config).await.unwrap();

    assert_eq!(summary.databases_created, 1);
    assert_eq!(summary.row_filters_created, 1);
    // 1 database grant + 2 column grants + 1 row-filter grant + 1 column-filter grant
    assert_eq!(summary.grants_issued, 5);

    let grants = catalog.grants();

    // Database grant comes first and carries the split permission list.
    assert!(matches!(&grants[0].resource, Resource::Database { name } if name == "student_db"));
    assert_eq!(grants[0].permissions, vec!["SELECT", "ALTER"]);

    // Table grants express "only this column" via the complement set.
    assert_eq!(
        grants[1].excluded_columns.as_deref(),
        Some(&["gpa".to_string()][..])
    );
    assert_eq!(
        grants[2].excluded_columns.as_deref(),
        Some(&["ssn".to_string()][..])
    );

    // Row-filter grant is scoped to the named filter.
    assert_eq!(grants[3].row_filter.as_deref(), Some("active_only"));

    // Column filter hides exactly the listed column; the direction is the
    // inverse of the table-permission case.
    assert_eq!(
        grants[4].excluded_columns.as_deref(),
        Some(&["ssn".to_string()][..])
    );
    assert!(matches!(
        &grants[4].resource,
        Resource::Table { database, name }
            if database == "student_db" && name == "student_records"
    ));
}
