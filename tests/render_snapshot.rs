//! Snapshot tests for rendered manifests using insta.
//!
//! To update snapshots after intentional changes:
//! ```bash
//! cargo insta test --accept
//! ```

use manifest_union::config;
use manifest_union::phases::orchestrator::options_from_config;
use manifest_union::phases::{aggregate, Namespace, ProjectFilter};
use manifest_union::render::render_to_string;
use manifest_union::repository::MemorySource;

const LINEAGE: &str = r#"
remote:
  name: github
  fetch: ".."
  review: review.lineageos.org
namespaces:
  - name: lineage
    source: { url: https://github.com/LineageOS/android, refs: branches, follow_includes: true }
    filter: { name_prefixes: ["LineageOS/"] }
"#;

#[test]
fn test_lineage_manifest_snapshot() {
    let config = config::parse(LINEAGE).unwrap();

    let source = MemorySource::new("lineage")
        .with_document(
            "lineage-20.0",
            "default.xml",
            r#"<manifest>
  <include name="snippets/lineage.xml" />
  <project name="platform/build" />
  <project name="LineageOS/android_build" path="build/make" />
</manifest>"#,
        )
        .with_document(
            "lineage-20.0",
            "snippets/lineage.xml",
            r#"<manifest>
  <project name="LineageOS/android_vendor_lineage" path="vendor/lineage" />
  <project name="LineageOS/android_prebuilts_gcc_darwin-x86_arm" />
</manifest>"#,
        )
        .with_projects(
            "lineage-21.0",
            &["LineageOS/android_build", "LineageOS/android_build/soong", "TheMuppets/x"],
        );

    let namespace = Namespace::new("lineage", source)
        .follow_includes(true)
        .filter(ProjectFilter {
            name_prefixes: vec!["LineageOS/".to_string()],
            remotes: vec![],
        });

    let manifest = aggregate(
        &[namespace],
        &config.classifier().unwrap(),
        &options_from_config(&config),
    )
    .unwrap();
    let rendered = render_to_string(&manifest, &config.header()).unwrap();

    insta::assert_snapshot!("lineage_manifest", rendered);
}
