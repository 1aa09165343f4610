use std::collections::HashMap;

use indexmap::IndexMap;

use crate::{
    Lexer, ROOT_PATH, SceneDescriptor, SceneNode, SceneNodeData, SceneParseError, SceneValue,
    Token, node_path,
};

pub struct Parser<'a> {
    src: &'a str,
    lexer: Lexer<'a>,
    current: Token,
    line: usize,
    vars: HashMap<String, SceneValue>,
}

/// A node block before parent keys are resolved into paths.
struct RawNode {
    key: String,
    name: Option<String>,
    parent: Option<String>,
    properties: IndexMap<String, SceneValue>,
    instance: Option<String>,
    data: Option<SceneNodeData>,
}

impl<'a> Parser<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            lexer: Lexer::new(src),
            current: Token::Eof,
            line: 1,
            vars: HashMap::new(),
        }
    }

    fn advance(&mut self) -> Result<(), SceneParseError> {
        self.current = self.lexer.next_token()?;
        self.line = self.lexer.line();
        Ok(())
    }

    fn unexpected<T>(&self, expected: &str) -> Result<T, SceneParseError> {
        Err(SceneParseError::Unexpected {
            line: self.line,
            expected: expected.to_string(),
            found: self.current.describe(),
        })
    }

    fn expect(&mut self, t: Token) -> Result<(), SceneParseError> {
        if self.current != t {
            return self.unexpected(&t.describe());
        }
        self.advance()
    }

    fn expect_ident(&mut self) -> Result<String, SceneParseError> {
        match std::mem::replace(&mut self.current, Token::Eof) {
            Token::Ident(s) => {
                self.advance()?;
                Ok(s)
            }
            other => {
                self.current = other;
                self.unexpected("identifier")
            }
        }
    }
}

impl<'a> Parser<'a> {
    /// First pass: collect `@name = value` definitions so later lines may
    /// reference variables declared further down.
    fn collect_vars(mut self) -> Result<HashMap<String, SceneValue>, SceneParseError> {
        self.advance()?;
        while self.current != Token::Eof {
            if self.current == Token::At {
                self.advance()?;
                let Token::Ident(_) = self.current else {
                    continue;
                };
                let name = self.expect_ident()?;
                if self.current == Token::Equals {
                    self.advance()?;
                    // forward references resolve on the second pass
                    if let Ok(value) = self.parse_value() {
                        self.vars.insert(name, value);
                    }
                }
                continue;
            }
            self.advance()?;
        }

        Ok(self.vars)
    }

    fn parse_value(&mut self) -> Result<SceneValue, SceneParseError> {
        match &self.current {
            Token::Number(n) => {
                let v = *n;
                self.advance()?;
                Ok(SceneValue::F32(v))
            }

            Token::String(s) => {
                let v = s.clone();
                self.advance()?;
                Ok(SceneValue::Str(v))
            }

            Token::At => {
                self.advance()?;
                let line = self.line;
                let name = self.expect_ident()?;
                self.vars
                    .get(&name)
                    .cloned()
                    .ok_or(SceneParseError::UnknownVariable { line, name })
            }

            Token::Ident(name) => {
                let value = match name.as_str() {
                    "true" => SceneValue::Bool(true),
                    "false" => SceneValue::Bool(false),
                    _ => SceneValue::Key(name.clone()),
                };
                self.advance()?;
                Ok(value)
            }

            Token::LParen => {
                self.advance()?;
                let mut nums = Vec::new();
                loop {
                    if let Token::Number(n) = self.current {
                        nums.push(n);
                        self.advance()?;
                    }
                    if self.current == Token::Comma {
                        self.advance()?;
                        continue;
                    }
                    break;
                }
                let line = self.line;
                self.expect(Token::RParen)?;

                match nums[..] {
                    [x, y] => Ok(SceneValue::Vec2 { x, y }),
                    [x, y, z] => Ok(SceneValue::Vec3 { x, y, z }),
                    [x, y, z, w] => Ok(SceneValue::Vec4 { x, y, z, w }),
                    _ => Err(SceneParseError::InvalidVector {
                        line,
                        count: nums.len(),
                    }),
                }
            }

            _ => self.unexpected("value"),
        }
    }
}

impl<'a> Parser<'a> {
    fn parse_type_block_after_lbracket(&mut self) -> Result<SceneNodeData, SceneParseError> {
        let ty = self.expect_ident()?;
        self.expect(Token::RBracket)?;

        let mut fields = IndexMap::new();
        let mut base = None;

        loop {
            match &self.current {
                Token::LBracket => {
                    self.advance()?;
                    if self.current == Token::Slash {
                        self.advance()?;
                        let line = self.line;
                        let end = self.expect_ident()?;
                        self.expect(Token::RBracket)?;
                        if end != ty {
                            return Err(SceneParseError::MismatchedClose {
                                line,
                                open: ty,
                                close: end,
                            });
                        }
                        break;
                    }
                    let nested = self.parse_type_block_after_lbracket()?;
                    base = Some(Box::new(nested));
                }

                Token::Ident(_) => {
                    let key = self.expect_ident()?;
                    self.expect(Token::Equals)?;
                    let val = self.parse_value()?;
                    fields.insert(key, val);
                }

                _ => return self.unexpected(&format!("field or `[/{ty}]`")),
            }
        }

        Ok(SceneNodeData { ty, fields, base })
    }

    fn parse_node_block(&mut self) -> Result<RawNode, SceneParseError> {
        let key = self.expect_ident()?;
        self.expect(Token::RBracket)?;

        let mut node = RawNode {
            key,
            name: None,
            parent: None,
            properties: IndexMap::new(),
            instance: None,
            data: None,
        };

        while matches!(self.current, Token::Ident(_)) {
            let line = self.line;
            let k = self.expect_ident()?;
            self.expect(Token::Equals)?;
            let v = self.parse_value()?;
            match k.as_str() {
                "name" => match v {
                    SceneValue::Str(s) => node.name = Some(s),
                    _ => {
                        return Err(SceneParseError::InvalidField {
                            line,
                            field: "name",
                            expected: "a string",
                        });
                    }
                },
                "parent" => match v {
                    SceneValue::Key(k) => node.parent = Some(k),
                    _ => {
                        return Err(SceneParseError::InvalidField {
                            line,
                            field: "parent",
                            expected: "a node key",
                        });
                    }
                },
                "instance" => match v {
                    SceneValue::Str(s) => node.instance = Some(s),
                    _ => {
                        return Err(SceneParseError::InvalidField {
                            line,
                            field: "instance",
                            expected: "a descriptor path string",
                        });
                    }
                },
                "script" if v.as_str().is_none() => {
                    return Err(SceneParseError::InvalidField {
                        line,
                        field: "script",
                        expected: "a script path string",
                    });
                }
                _ => {
                    node.properties.insert(k, v);
                }
            }
        }

        // optional type block, then the closing `[/key]`
        self.expect(Token::LBracket)?;
        if self.current != Token::Slash {
            node.data = Some(self.parse_type_block_after_lbracket()?);
            self.expect(Token::LBracket)?;
        }
        self.expect(Token::Slash)?;
        let line = self.line;
        let end = self.expect_ident()?;
        self.expect(Token::RBracket)?;
        if end != node.key {
            return Err(SceneParseError::MismatchedClose {
                line,
                open: node.key,
                close: end,
            });
        }

        Ok(node)
    }
}

impl<'a> Parser<'a> {
    fn parse_scene_inner(mut self) -> Result<SceneDescriptor, SceneParseError> {
        let mut root = None;
        let mut raw_nodes = Vec::new();

        self.advance()?;
        while self.current != Token::Eof {
            match self.current {
                Token::At => {
                    self.advance()?;
                    let name = self.expect_ident()?;
                    self.expect(Token::Equals)?;
                    let line = self.line;
                    let value = self.parse_value()?;

                    if name == "root" {
                        // root value must be a scene key (bare identifier)
                        match &value {
                            SceneValue::Key(key) => root = Some(key.clone()),
                            _ => {
                                return Err(SceneParseError::InvalidField {
                                    line,
                                    field: "@root",
                                    expected: "a node key",
                                });
                            }
                        }
                    }
                    self.vars.insert(name, value);
                }

                Token::LBracket => {
                    self.advance()?;
                    raw_nodes.push(self.parse_node_block()?);
                }

                _ => return self.unexpected("`@variable` or `[node]`"),
            }
        }

        build_descriptor(root, raw_nodes)
    }

    pub fn parse_scene(self) -> Result<SceneDescriptor, SceneParseError> {
        let vars = Parser::new(self.src).collect_vars()?;
        let mut parser = Parser::new(self.src);
        parser.vars = vars;
        parser.parse_scene_inner()
    }
}

/// Resolves parent keys into root-relative parent paths, keeping declaration order.
fn build_descriptor(
    root: Option<String>,
    raw_nodes: Vec<RawNode>,
) -> Result<SceneDescriptor, SceneParseError> {
    let mut by_key: HashMap<&str, usize> = HashMap::with_capacity(raw_nodes.len());
    for (i, node) in raw_nodes.iter().enumerate() {
        if by_key.insert(node.key.as_str(), i).is_some() {
            return Err(SceneParseError::DuplicateKey(node.key.clone()));
        }
    }

    let root = match root {
        Some(key) => {
            if !by_key.contains_key(key.as_str()) {
                return Err(SceneParseError::MissingRoot(key));
            }
            key
        }
        None => raw_nodes
            .iter()
            .find(|n| n.parent.is_none())
            .map(|n| n.key.clone())
            .ok_or(SceneParseError::NoRoot)?,
    };

    let mut paths: HashMap<String, String> = HashMap::with_capacity(raw_nodes.len());
    paths.insert(root.clone(), ROOT_PATH.to_string());

    for node in &raw_nodes {
        resolve_path(&node.key, &root, &raw_nodes, &by_key, &mut paths)?;
    }

    let mut seen: HashMap<&str, &str> = HashMap::with_capacity(raw_nodes.len());
    for node in &raw_nodes {
        let path = if node.key == root {
            ROOT_PATH
        } else {
            paths[&node.key].as_str()
        };
        if let Some(first) = seen.insert(path, node.key.as_str()) {
            return Err(SceneParseError::DuplicatePath {
                path: path.to_string(),
                first: first.to_string(),
                second: node.key.clone(),
            });
        }
    }

    let nodes = raw_nodes
        .into_iter()
        .map(|raw| {
            let name = raw.name.unwrap_or_else(|| raw.key.clone());
            let parent = if raw.key == root {
                None
            } else {
                raw.parent.as_ref().and_then(|p| paths.get(p)).cloned()
            };
            SceneNode {
                key: raw.key,
                name,
                parent,
                properties: raw.properties,
                instance: raw.instance,
                data: raw.data,
            }
        })
        .collect();

    Ok(SceneDescriptor { root, nodes })
}

fn resolve_path(
    key: &str,
    root: &str,
    raw_nodes: &[RawNode],
    by_key: &HashMap<&str, usize>,
    paths: &mut HashMap<String, String>,
) -> Result<(), SceneParseError> {
    // walk up until a node with a known path, then fill the chain back down
    let mut chain: Vec<&RawNode> = Vec::new();
    let mut cursor = key;
    while !paths.contains_key(cursor) {
        let node = &raw_nodes[by_key[cursor]];
        if chain.iter().any(|n| n.key == node.key) {
            return Err(SceneParseError::ParentCycle(node.key.clone()));
        }
        chain.push(node);
        let parent = node
            .parent
            .as_deref()
            .ok_or_else(|| SceneParseError::OrphanNode(node.key.clone()))?;
        if !by_key.contains_key(parent) {
            return Err(SceneParseError::UnknownParent {
                node: node.key.clone(),
                parent: parent.to_string(),
            });
        }
        cursor = parent;
    }
    debug_assert!(paths.contains_key(root));

    for node in chain.into_iter().rev() {
        let parent = node.parent.as_deref().unwrap_or(root);
        let parent_path = paths.get(parent).cloned();
        let name = node.name.as_deref().unwrap_or(&node.key);
        paths.insert(node.key.clone(), node_path(parent_path.as_deref(), name));
    }
    Ok(())
}
