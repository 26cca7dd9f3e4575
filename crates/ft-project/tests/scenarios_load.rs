use std::path::Path;

#[test]
fn bundled_scenarios_load_and_validate() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../scenarios");
    let scenarios = [
        "reference_blowdown.yaml",
        "capillary_filling.yaml",
        "custom_gas.json",
    ];

    for name in scenarios {
        let path = root.join(name);
        let scenario =
            ft_project::load(&path).unwrap_or_else(|e| panic!("Failed to load {}: {}", name, e));
        assert!(!scenario.analyses.is_empty(), "{name} has no analyses");
    }
}
