//! Integration tests for loading C/C++ sources from disk.
//!
//! These tests run the full pipeline: walking, tree-sitter parsing,
//! declaration extraction and type tree construction.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use tempfile::TempDir;

use cpp_type_index::config::CONFIG_FILENAME;
use cpp_type_index::{CompoundKind, Config, DeclKind, LoadReport, Program};

fn create_file(dir: &Path, name: &str, content: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let mut file = File::create(path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
}

fn kinds_of(program: &Program, name: &str) -> Vec<DeclKind> {
    program
        .resolve_declarations(name, program.root())
        .into_iter()
        .map(|d| d.kind)
        .collect()
}

const RENDERER_H: &str = r#"
#ifndef GFX_RENDERER_H
#define GFX_RENDERER_H

namespace gfx {

class Texture;

class Renderer {
public:
    typedef unsigned int Handle;
    typedef void (*FrameCallback)(Renderer*, int);
    using Clock = unsigned long;

    struct Options {
        int width;
        int height;
    };

    void draw(Handle handle);

private:
    Options options_;
};

}  // namespace gfx

#endif
"#;

const TEXTURE_H: &str = r#"
#pragma once

namespace gfx {

class Texture {
public:
    enum class Format { Rgba, Bgra };
    Format format() const;
};

union Pixel {
    unsigned int packed;
    unsigned char channels[4];
};

}  // namespace gfx

typedef struct Rect { int x, y, w, h; } Rect_t;
"#;

const MAIN_CPP: &str = r#"
#include "gfx/renderer.h"

int frame_count = 0;

int main() {
    struct Local { int value; };
    return 0;
}
"#;

fn create_project() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    create_file(temp_dir.path(), "include/gfx/renderer.h", RENDERER_H);
    create_file(temp_dir.path(), "include/gfx/texture.h", TEXTURE_H);
    create_file(temp_dir.path(), "src/main.cpp", MAIN_CPP);
    create_file(temp_dir.path(), "README.md", "# gfx\n");
    temp_dir
}

// ============================================================================
// Loading
// ============================================================================

mod loading {
    use super::*;

    #[test]
    fn test_load_directory() {
        let project = create_project();
        let mut program = Program::new();
        let report = program.load_program(project.path());

        assert_eq!(
            report,
            LoadReport {
                files_found: 3,
                files_loaded: 3,
                files_failed: 0,
            }
        );
        assert_eq!(program.files().len(), 3);
    }

    #[test]
    fn test_files_load_in_path_order() {
        let project = create_project();
        let mut program = Program::new();
        program.load_program(project.path());

        let names: Vec<String> = program
            .files()
            .iter()
            .map(|id| program.forest().get(*id).unwrap().name.clone())
            .collect();
        assert!(names[0].ends_with("renderer.h"));
        assert!(names[1].ends_with("texture.h"));
        assert!(names[2].ends_with("main.cpp"));
    }

    #[test]
    fn test_load_single_file() {
        let project = create_project();
        let mut program = Program::new();
        let report = program.load_program(project.path().join("include/gfx/texture.h"));

        assert_eq!(report.files_loaded, 1);
        assert!(program.resolve_from_root("gfx::Texture").is_some());
        assert!(program.resolve_from_root("gfx::Renderer").is_none());
    }

    #[test]
    fn test_load_missing_path_is_not_an_error() {
        let project = create_project();
        let mut program = Program::new();
        let report = program.load_program(project.path().join("nope"));

        assert_eq!(report, LoadReport::default());
        assert_eq!(program.stats().tree_nodes, 1);
    }

    #[test]
    fn test_incremental_loads_extend_the_tree() {
        let project = create_project();
        let mut program = Program::new();
        program.load_program(project.path().join("include/gfx/renderer.h"));
        let texture = program.resolve_from_root("gfx::Texture").unwrap();
        assert_eq!(program.contributors(texture).len(), 1);

        program.load_program(project.path().join("include/gfx/texture.h"));
        assert_eq!(program.files().len(), 2);
        assert_eq!(program.resolve_from_root("gfx::Texture"), Some(texture));
        assert_eq!(program.contributors(texture).len(), 2);
    }

    #[test]
    fn test_sequential_parse_matches_parallel() {
        let project = create_project();

        let mut parallel = Program::new();
        parallel.load_program(project.path());

        let mut config = Config::default();
        config.parse.parallel = false;
        let mut sequential = Program::with_config(config);
        sequential.load_program(project.path());

        assert_eq!(parallel.stats(), sequential.stats());
    }

    #[test]
    fn test_config_extra_extensions() {
        let temp_dir = TempDir::new().unwrap();
        create_file(temp_dir.path(), "detail/impl.tpp", "namespace detail { struct Impl {}; }");
        create_file(temp_dir.path(), CONFIG_FILENAME, "[parse]\nextra_extensions = [\"tpp\"]\n");

        let mut program = Program::new();
        assert_eq!(program.load_program(temp_dir.path()).files_found, 0);

        let config = Config::discover(temp_dir.path()).unwrap();
        let mut program = Program::with_config(config);
        assert_eq!(program.load_program(temp_dir.path()).files_loaded, 1);
        assert!(program.resolve_from_root("detail::Impl").is_some());
    }
}

// ============================================================================
// Resolution over parsed sources
// ============================================================================

mod resolution {
    use super::*;

    fn loaded() -> (Program, TempDir) {
        let project = create_project();
        let mut program = Program::new();
        program.load_program(project.path());
        (program, project)
    }

    #[test]
    fn test_cross_file_namespace_merge() {
        let (program, _project) = loaded();

        let gfx = program.resolve_from_root("gfx").unwrap();
        let node = program.tree().node(gfx).unwrap();
        assert_eq!(program.contributors(gfx).len(), 2);
        for child in ["Renderer", "Texture", "Pixel"] {
            assert!(node.children.contains_key(child), "gfx::{} missing", child);
        }
    }

    #[test]
    fn test_member_types() {
        let (program, _project) = loaded();

        assert_eq!(kinds_of(&program, "gfx::Renderer::Handle"), vec![DeclKind::TypeAlias]);
        assert_eq!(kinds_of(&program, "gfx::Renderer::Clock"), vec![DeclKind::TypeAlias]);
        assert_eq!(
            kinds_of(&program, "gfx::Renderer::FrameCallback"),
            vec![DeclKind::FunctionPointerType]
        );
        assert_eq!(
            kinds_of(&program, "gfx::Renderer::Options"),
            vec![DeclKind::Compound(CompoundKind::Struct)]
        );
        assert_eq!(
            kinds_of(&program, "gfx::Pixel"),
            vec![DeclKind::Compound(CompoundKind::Union)]
        );
    }

    #[test]
    fn test_forward_declaration_and_definition_share_a_node() {
        let (program, _project) = loaded();

        let kinds = kinds_of(&program, "gfx::Texture");
        assert_eq!(kinds.len(), 2);
        assert!(kinds.iter().all(|k| *k == DeclKind::Compound(CompoundKind::Class)));
    }

    #[test]
    fn test_typedef_struct() {
        let (program, _project) = loaded();

        assert_eq!(
            kinds_of(&program, "Rect"),
            vec![DeclKind::Compound(CompoundKind::Struct)]
        );
        assert_eq!(kinds_of(&program, "Rect_t"), vec![DeclKind::TypeAlias]);
    }

    #[test]
    fn test_functions_variables_and_enums_are_not_indexed() {
        let (program, _project) = loaded();

        assert!(program.resolve_from_root("main").is_none());
        assert!(program.resolve_from_root("frame_count").is_none());
        assert!(program.resolve_from_root("Local").is_none());
        assert!(program.resolve_from_root("gfx::Renderer::draw").is_none());
        assert!(program.resolve_from_root("gfx::Renderer::options_").is_none());
        assert!(program.resolve_from_root("gfx::Texture::Format").is_none());
    }

    #[test]
    fn test_unqualified_lookup_from_member_scope() {
        let (program, _project) = loaded();

        let options = program.resolve_from_root("gfx::Renderer::Options").unwrap();
        let handle = program.resolve("Handle", options).unwrap();
        assert_eq!(program.qualified_name(handle), "gfx::Renderer::Handle");

        let texture = program.resolve("Texture", options).unwrap();
        assert_eq!(program.qualified_name(texture), "gfx::Texture");

        let rect = program.resolve("Rect_t", options).unwrap();
        assert_eq!(program.qualified_name(rect), "Rect_t");

        assert!(program.resolve("Renderer::Options::Handle", options).is_none());
    }

    #[test]
    fn test_declarations_carry_locations() {
        let (program, _project) = loaded();

        let decls = program.resolve_declarations("gfx::Renderer", program.root());
        assert_eq!(decls.len(), 1);
        let location = decls[0].location.as_ref().unwrap();
        assert!(location.file.ends_with("include/gfx/renderer.h"));
        assert_eq!(location.start_line, 9);
    }

    #[test]
    fn test_out_of_line_class_definition() {
        let temp_dir = TempDir::new().unwrap();
        create_file(
            temp_dir.path(),
            "nested.h",
            "class A { class B; };\nclass A::B { typedef int T; };\n",
        );

        let mut program = Program::new();
        program.load_program(temp_dir.path());

        let t = program.resolve_from_root("A::B::T").unwrap();
        assert_eq!(program.qualified_name(t), "A::B::T");
        assert_eq!(kinds_of(&program, "A::B").len(), 2);
        assert!(program.resolve_from_root("B").is_none());
        assert!(program.resolve_from_root("B::T").is_none());

        let a = program.resolve_from_root("A").unwrap();
        let b = program.resolve("B", a).unwrap();
        assert_eq!(program.resolve("T", b), Some(t));
    }
}
