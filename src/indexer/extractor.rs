//! Declaration extraction from C/C++ syntax trees
//!
//! Produces one [`DeclNode`] file root per parsed file. Only the structure the
//! type tree needs is kept: compounds with their members, type aliases,
//! function pointer typedefs, and `Other` placeholders for everything else
//! that declares a name. Function bodies are never entered.

use std::path::Path;

use tree_sitter::Node;

use crate::dom::{CompoundKind, DeclKind, DeclNode, Location};
use crate::indexer::parser::ParsedFile;
use crate::type_tree::SCOPE_SEPARATOR;

struct Context<'a> {
    parsed: &'a ParsedFile,
    file_path: &'a Path,
}

#[derive(Default)]
pub struct DeclExtractor;

impl DeclExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract(&self, parsed: &ParsedFile, file_path: &Path) -> DeclNode {
        let ctx = Context { parsed, file_path };
        let root = parsed.root_node();

        let mut file =
            DeclNode::file(file_path.to_string_lossy()).with_location(self.location(&ctx, &root));
        self.collect_children(&ctx, &root, &mut file.members);
        place_out_of_line(&mut file.members);
        file
    }

    fn collect_children(&self, ctx: &Context, node: &Node, out: &mut Vec<DeclNode>) {
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            self.collect_member(ctx, &child, out);
        }
    }

    fn collect_member(&self, ctx: &Context, node: &Node, out: &mut Vec<DeclNode>) {
        let grammar = &ctx.parsed.grammar;
        let kind = node.kind();

        if grammar.is_transparent(kind) {
            self.collect_children(ctx, node, out);
            return;
        }

        // Bare specifiers: `class C;` and `struct S { ... };`
        if let Some(compound_kind) = grammar.compound_kind(kind) {
            out.extend(self.compound(ctx, node, compound_kind));
            return;
        }

        match kind {
            "namespace_definition" => self.collect_namespace(ctx, node, out),
            "type_definition" => self.collect_typedef(ctx, node, out),
            "alias_declaration" => out.extend(self.alias(ctx, node)),
            "declaration" | "field_declaration" => self.collect_declaration(ctx, node, out),
            "function_definition" => {
                let name = node
                    .child_by_field_name("declarator")
                    .and_then(|d| self.declarator_name(ctx, &d));
                if let Some(name) = name {
                    out.push(DeclNode::other(name).with_location(self.location(ctx, node)));
                }
            }
            "enum_specifier" => out.extend(self.enumeration(ctx, node)),
            _ => {}
        }
    }

    fn collect_namespace(&self, ctx: &Context, node: &Node, out: &mut Vec<DeclNode>) {
        let mut members = Vec::new();
        if let Some(body) = node.child_by_field_name("body") {
            self.collect_children(ctx, &body, &mut members);
            place_out_of_line(&mut members);
        }

        // Members of an anonymous namespace are visible in the enclosing one.
        let Some(name_node) = node.child_by_field_name("name") else {
            out.extend(members);
            return;
        };

        let text = ctx.parsed.node_text(&name_node);
        let parts: Vec<&str> = text
            .split(SCOPE_SEPARATOR)
            .map(|part| {
                let part = part.trim();
                part.strip_prefix("inline ").unwrap_or(part).trim()
            })
            .filter(|part| !part.is_empty())
            .collect();

        let location = self.location(ctx, node);
        let mut nested: Option<DeclNode> = None;
        for part in parts.iter().rev() {
            let mut namespace = DeclNode::namespace(*part).with_location(location.clone());
            match nested.take() {
                Some(inner) => namespace.members.push(inner),
                None => namespace.members = std::mem::take(&mut members),
            }
            nested = Some(namespace);
        }

        match nested {
            Some(namespace) => out.push(namespace),
            None => out.extend(members),
        }
    }

    fn collect_typedef(&self, ctx: &Context, node: &Node, out: &mut Vec<DeclNode>) {
        // typedef struct Tag { ... } Alias;
        if let Some(ty) = node.child_by_field_name("type") {
            if let Some(compound_kind) = ctx.parsed.grammar.compound_kind(ty.kind()) {
                if ty.child_by_field_name("body").is_some() {
                    out.extend(self.compound(ctx, &ty, compound_kind));
                }
            }
        }

        let location = self.location(ctx, node);
        let mut cursor = node.walk();
        for declarator in node.children_by_field_name("declarator", &mut cursor) {
            let Some(name) = self.declarator_name(ctx, &declarator) else {
                continue;
            };
            let kind = if self.is_function_pointer(&declarator) {
                DeclKind::FunctionPointerType
            } else {
                DeclKind::TypeAlias
            };
            out.push(DeclNode::new(kind, name).with_location(location.clone()));
        }
    }

    fn alias(&self, ctx: &Context, node: &Node) -> Option<DeclNode> {
        let name = node
            .child_by_field_name("name")
            .map(|n| ctx.parsed.node_text(&n).to_string())?;
        let function_pointer = node
            .child_by_field_name("type")
            .is_some_and(|ty| self.is_function_pointer(&ty));

        let kind = if function_pointer {
            DeclKind::FunctionPointerType
        } else {
            DeclKind::TypeAlias
        };
        Some(DeclNode::new(kind, name).with_location(self.location(ctx, node)))
    }

    fn collect_declaration(&self, ctx: &Context, node: &Node, out: &mut Vec<DeclNode>) {
        let mut cursor = node.walk();
        let declarators: Vec<Node> = node
            .children_by_field_name("declarator", &mut cursor)
            .collect();

        if let Some(ty) = node.child_by_field_name("type") {
            if let Some(compound_kind) = ctx.parsed.grammar.compound_kind(ty.kind()) {
                // `struct S s;` only names S; a body or a bare forward
                // declaration introduces it.
                if ty.child_by_field_name("body").is_some() || declarators.is_empty() {
                    out.extend(self.compound(ctx, &ty, compound_kind));
                }
            } else if ty.kind() == "enum_specifier" && ty.child_by_field_name("body").is_some() {
                out.extend(self.enumeration(ctx, &ty));
            }
        }

        let location = self.location(ctx, node);
        for declarator in &declarators {
            if let Some(name) = self.declarator_name(ctx, declarator) {
                out.push(DeclNode::other(name).with_location(location.clone()));
            }
        }
    }

    /// A compound defined out of line (`class A::B { ... }`) keeps its full
    /// qualified name until [`place_out_of_line`] moves it under `A`.
    fn compound(&self, ctx: &Context, node: &Node, kind: CompoundKind) -> Option<DeclNode> {
        let name_node = node.child_by_field_name("name")?;
        let name = if name_node.kind() == "qualified_identifier" {
            self.qualified_segments(ctx, &name_node)?.join(SCOPE_SEPARATOR)
        } else {
            self.declarator_name(ctx, &name_node)?
        };

        let mut compound =
            DeclNode::new(DeclKind::Compound(kind), name).with_location(self.location(ctx, node));
        if let Some(body) = node.child_by_field_name("body") {
            self.collect_children(ctx, &body, &mut compound.members);
            place_out_of_line(&mut compound.members);
        }
        Some(compound)
    }

    /// `A::B::C` as `["A", "B", "C"]`. Globally qualified names (`::A::B`)
    /// yield `None`.
    fn qualified_segments(&self, ctx: &Context, node: &Node) -> Option<Vec<String>> {
        let mut segments = Vec::new();
        let mut current = *node;
        while current.kind() == "qualified_identifier" {
            let scope = current.child_by_field_name("scope")?;
            segments.push(self.declarator_name(ctx, &scope)?);
            current = current.child_by_field_name("name")?;
        }
        segments.push(self.declarator_name(ctx, &current)?);
        Some(segments)
    }

    fn enumeration(&self, ctx: &Context, node: &Node) -> Option<DeclNode> {
        let name = node
            .child_by_field_name("name")
            .and_then(|n| self.declarator_name(ctx, &n))?;
        Some(DeclNode::other(name).with_location(self.location(ctx, node)))
    }

    /// Innermost declared name of a declarator, e.g. `Fn` in `(*Fn)(int)`.
    fn declarator_name(&self, ctx: &Context, node: &Node) -> Option<String> {
        match node.kind() {
            "identifier" | "type_identifier" | "field_identifier" | "namespace_identifier"
            | "operator_name" | "destructor_name" => {
                Some(ctx.parsed.node_text(node).to_string())
            }
            "qualified_identifier" | "template_type" | "template_function" => node
                .child_by_field_name("name")
                .and_then(|n| self.declarator_name(ctx, &n)),
            _ => {
                if let Some(inner) = node.child_by_field_name("declarator") {
                    return self.declarator_name(ctx, &inner);
                }
                let mut cursor = node.walk();
                let children: Vec<Node> = node.named_children(&mut cursor).collect();
                children
                    .iter()
                    .find_map(|child| self.declarator_name(ctx, child))
            }
        }
    }

    fn is_function_pointer(&self, node: &Node) -> bool {
        match node.kind() {
            "function_declarator" | "abstract_function_declarator" => node
                .child_by_field_name("declarator")
                .is_some_and(|inner| self.is_pointer(&inner)),
            "type_descriptor" => node
                .child_by_field_name("declarator")
                .is_some_and(|inner| self.is_function_pointer(&inner)),
            _ => false,
        }
    }

    fn is_pointer(&self, node: &Node) -> bool {
        match node.kind() {
            "pointer_declarator" | "abstract_pointer_declarator" => true,
            "parenthesized_declarator" | "abstract_parenthesized_declarator" => {
                let mut cursor = node.walk();
                let children: Vec<Node> = node.named_children(&mut cursor).collect();
                children.iter().any(|child| self.is_pointer(child))
            }
            _ => false,
        }
    }

    fn location(&self, ctx: &Context, node: &Node) -> Location {
        Location::new(
            ctx.file_path,
            node.start_position().row as u32 + 1,
            node.end_position().row as u32 + 1,
        )
    }
}

fn is_out_of_line(decl: &DeclNode) -> bool {
    matches!(decl.kind, DeclKind::Compound(_)) && decl.name.contains(SCOPE_SEPARATOR)
}

/// Moves out-of-line compound definitions under the compound their qualifier
/// names. The qualifier must be declared in `members`; definitions whose
/// qualifier is declared elsewhere are dropped.
fn place_out_of_line(members: &mut Vec<DeclNode>) {
    if !members.iter().any(is_out_of_line) {
        return;
    }

    let (pending, rest): (Vec<DeclNode>, Vec<DeclNode>) =
        std::mem::take(members).into_iter().partition(is_out_of_line);
    *members = rest;

    for mut decl in pending {
        let path: Vec<String> = decl.name.split(SCOPE_SEPARATOR).map(str::to_string).collect();
        let Some((name, qualifier)) = path.split_last() else {
            continue;
        };
        let target = locate(members, qualifier).and_then(|indices| scope_mut(members, &indices));
        match target {
            Some(scope) => {
                decl.name = name.clone();
                scope.members.push(decl);
            }
            None => tracing::debug!("Dropping {}: enclosing scope not declared here", decl.name),
        }
    }
}

/// Index path to the compound named by `path`, preferring later declarations.
fn locate(members: &[DeclNode], path: &[String]) -> Option<Vec<usize>> {
    let (first, rest) = path.split_first()?;
    members.iter().enumerate().rev().find_map(|(i, member)| {
        if !matches!(member.kind, DeclKind::Compound(_)) || member.name != *first {
            return None;
        }
        if rest.is_empty() {
            return Some(vec![i]);
        }
        locate(&member.members, rest).map(|mut tail| {
            tail.insert(0, i);
            tail
        })
    })
}

fn scope_mut<'a>(members: &'a mut [DeclNode], indices: &[usize]) -> Option<&'a mut DeclNode> {
    let (first, rest) = indices.split_first()?;
    let mut scope = members.get_mut(*first)?;
    for &i in rest {
        scope = scope.members.get_mut(i)?;
    }
    Some(scope)
}
