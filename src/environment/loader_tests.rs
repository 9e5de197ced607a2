#[cfg(test)]
mod tests {
    use crate::constants::{DEFAULT_DOCUMENT_FILENAME, NATIVE_NAMESPACE};
    use crate::core::EnvspecError;
    use crate::environment::{LoadOptions, from_file, from_yaml, load_from_directory};
    use std::collections::BTreeMap;
    use std::path::Path;
    use tempfile::tempdir;

    fn write_doc(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_from_yaml_parses_all_fields() {
        let env = from_yaml(
            "name: demo\nchannels: [main]\ndependencies:\n  - python=3.12\nenvironment:\n  - HOME_BASE: /opt\naliases:\n  gs: git status\n",
            &LoadOptions::default(),
        )
        .unwrap();

        assert_eq!(env.name.as_deref(), Some("demo"));
        assert!(env.filename.is_none());
        assert_eq!(env.channels, vec!["main".to_string()]);
        assert_eq!(
            env.dependencies.namespace(NATIVE_NAMESPACE).unwrap(),
            &["python=3.12".to_string()]
        );
        assert_eq!(env.aliases.get("gs").unwrap(), "git status");
    }

    #[test]
    fn test_unknown_top_level_keys_are_ignored() {
        let env = from_yaml(
            "name: demo\nprefix: /opt/envs/demo\n",
            &LoadOptions::default(),
        )
        .unwrap();
        assert_eq!(env.name.as_deref(), Some("demo"));
    }

    #[test]
    fn test_from_file_records_absolute_origin() {
        let temp = tempdir().unwrap();
        let path = write_doc(temp.path(), "environment.yml", "name: here\n");
        let env = from_file(&path, &LoadOptions::default()).unwrap();
        let filename = env.filename.unwrap();
        assert!(filename.is_absolute());
        assert!(filename.ends_with("environment.yml"));
    }

    #[test]
    fn test_from_file_missing_path_is_document_not_found() {
        let temp = tempdir().unwrap();
        let missing = temp.path().join("nope.yml");
        let err = from_file(&missing, &LoadOptions::default()).unwrap_err();
        assert!(matches!(
            err.downcast::<EnvspecError>().unwrap(),
            EnvspecError::DocumentNotFound { path } if path.contains("nope.yml")
        ));
    }

    #[test]
    fn test_name_override_wins_over_document() {
        let opts = LoadOptions {
            name: Some("override".to_string()),
            ..LoadOptions::default()
        };
        let env = from_yaml("name: original\n", &opts).unwrap();
        assert_eq!(env.name.as_deref(), Some("override"));
    }

    #[test]
    fn test_name_override_does_not_leak_into_includes() {
        let temp = tempdir().unwrap();
        write_doc(temp.path(), "base.yml", "name: base\nchannels: [b]\n");
        let root = write_doc(
            temp.path(),
            "environment.yml",
            "name: top\nincludes:\n  - base.yml\n",
        );

        let opts = LoadOptions {
            name: Some("override".to_string()),
            ..LoadOptions::default()
        };
        let env = from_file(&root, &opts).unwrap();
        // The override applies to the root document; the included
        // document's channels still merge in.
        assert_eq!(env.name.as_deref(), Some("override"));
        assert_eq!(env.channels, vec!["b".to_string()]);
    }

    #[test]
    fn test_load_from_directory_probes_both_filenames() {
        let temp = tempdir().unwrap();
        write_doc(temp.path(), "environment.yaml", "name: long-extension\n");
        let env = load_from_directory(temp.path()).unwrap();
        assert_eq!(env.name.as_deref(), Some("long-extension"));
    }

    #[test]
    fn test_load_from_directory_prefers_yml_over_yaml() {
        let temp = tempdir().unwrap();
        write_doc(temp.path(), "environment.yml", "name: short\n");
        write_doc(temp.path(), "environment.yaml", "name: long\n");
        let env = load_from_directory(temp.path()).unwrap();
        assert_eq!(env.name.as_deref(), Some("short"));
    }

    #[test]
    fn test_load_from_directory_walks_up_to_parents() {
        let temp = tempdir().unwrap();
        write_doc(temp.path(), "environment.yml", "name: above\n");
        let deep = temp.path().join("src").join("module");
        std::fs::create_dir_all(&deep).unwrap();

        let env = load_from_directory(&deep).unwrap();
        assert_eq!(env.name.as_deref(), Some("above"));
    }

    #[test]
    fn test_load_from_directory_without_document_names_default() {
        let temp = tempdir().unwrap();
        let err = load_from_directory(temp.path()).unwrap_err();
        assert!(matches!(
            err.downcast::<EnvspecError>().unwrap(),
            EnvspecError::DocumentNotFound { path } if path == DEFAULT_DOCUMENT_FILENAME
        ));
    }

    #[test]
    fn test_template_variables_render_before_parsing() {
        let mut vars = BTreeMap::new();
        vars.insert("flavor".to_string(), "ci".to_string());
        let opts = LoadOptions {
            vars,
            ..LoadOptions::default()
        };
        let env = from_yaml("name: app-{{ flavor }}\n", &opts).unwrap();
        assert_eq!(env.name.as_deref(), Some("app-ci"));
    }

    #[test]
    fn test_root_template_variable_is_document_directory() {
        let temp = tempdir().unwrap();
        let path = write_doc(
            temp.path(),
            "environment.yml",
            "environment:\n  - TOOLS: \"{{ root }}/tools\"\n",
        );

        let env = from_file(&path, &LoadOptions::default()).unwrap();
        let canonical = temp.path().canonicalize().unwrap();
        assert_eq!(
            env.environment[0].value,
            format!("{}/tools", canonical.display())
        );
    }

    #[test]
    fn test_parse_failure_without_templating_blames_missing_engine() {
        let opts = LoadOptions {
            templating: false,
            ..LoadOptions::default()
        };
        let err = from_yaml("name: {{ flavor }}\n", &opts).unwrap_err();
        assert!(matches!(
            err.downcast::<EnvspecError>().unwrap(),
            EnvspecError::TemplateEngineUnavailable { .. }
        ));
    }

    #[test]
    fn test_templating_disabled_passes_plain_text_through() {
        let opts = LoadOptions {
            templating: false,
            ..LoadOptions::default()
        };
        let env = from_yaml("name: plain\n", &opts).unwrap();
        assert_eq!(env.name.as_deref(), Some("plain"));
    }

    #[test]
    fn test_parse_failure_with_templating_is_a_parse_error() {
        // Valid template syntax, malformed YAML: the engine is exonerated.
        let err = from_yaml("name: [unclosed\n", &LoadOptions::default()).unwrap_err();
        assert!(matches!(
            err.downcast::<EnvspecError>().unwrap(),
            EnvspecError::DocumentParseError { .. }
        ));
    }
}
