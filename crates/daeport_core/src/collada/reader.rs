//! COLLADA (`.dae`) document reader.
//!
//! Walks the XML tree with `roxmltree` and builds the [`ColladaDocument`]
//! model, resolving `#id` references along the way. Only the parts the
//! importer consumes are read:
//!
//! - `<library_images>`: `image/init_from` (1.4 text or 1.5 `ref`)
//! - `<library_effects>`: `profile_COMMON` parameters and technique
//! - `<library_materials>`: `instance_effect`
//! - `<library_geometries>`: `mesh` sources, `vertices` and primitives
//! - `<library_nodes>`: node definitions instanced through `instance_node`
//! - `<library_visual_scenes>`: nodes, transforms, `instance_geometry`
//! - `<scene>`: `instance_visual_scene`
//!
//! Everything else (animations, controllers, lights, cameras, ...) is ignored.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use daeport_math::{Mat4, Vec2, Vec3};
use roxmltree::Node;
use thiserror::Error;

use super::types::*;

/// Errors that can occur while reading a COLLADA document.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML error: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: u32, message: String },

    #[error("Invalid number format: {0}")]
    InvalidNumber(String),

    #[error("Broken reference '{reference}' at line {line}")]
    BrokenReference { line: u32, reference: String },
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

impl ColladaDocument {
    /// Parse a document from a string; image paths resolve against `base_dir`.
    pub fn parse(content: &str, base_dir: impl Into<PathBuf>) -> ParseResult<Self> {
        parse_collada(content, base_dir)
    }

    /// Read and parse a `.dae` file.
    pub fn open<P: AsRef<Path>>(path: P) -> ParseResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        parse_collada(&content, base_dir)
    }
}

/// Parse COLLADA content into a document model.
pub fn parse_collada(content: &str, base_dir: impl Into<PathBuf>) -> ParseResult<ColladaDocument> {
    let xml = roxmltree::Document::parse(content)?;
    let root = xml.root_element();

    if root.tag_name().name() != "COLLADA" {
        return Err(parse_error(
            root,
            format!("expected <COLLADA> root, found <{}>", root.tag_name().name()),
        ));
    }

    let mut reader = Reader::new(base_dir.into());

    // Libraries may appear in any order; read them in dependency order.
    for library in children(root, "library_images") {
        for image in children(library, "image") {
            reader.read_image(image)?;
        }
    }
    for library in children(root, "library_effects") {
        for effect in children(library, "effect") {
            reader.read_effect(effect)?;
        }
    }
    for library in children(root, "library_materials") {
        for material in children(library, "material") {
            reader.read_material(material)?;
        }
    }
    for library in children(root, "library_geometries") {
        for geometry in children(library, "geometry") {
            reader.read_geometry(geometry)?;
        }
    }

    let mut library_nodes = NodeLibrary::new();
    for library in children(root, "library_nodes") {
        for node in library.descendants().filter(|n| n.tag_name().name() == "node") {
            if let Some(id) = node.attribute("id") {
                library_nodes.insert(id, node);
            }
        }
    }

    for library in children(root, "library_visual_scenes") {
        for scene in children(library, "visual_scene") {
            reader.read_visual_scene(scene, &library_nodes)?;
        }
    }

    reader.finish(root)
}

/// `<library_nodes>` entries by id.
type NodeLibrary<'a, 'input> = HashMap<&'a str, Node<'a, 'input>>;

/// A `<newparam>` of a `profile_COMMON` effect.
enum Param {
    Surface { image: String },
    Sampler(SamplerSource),
}

enum SamplerSource {
    /// 1.4: sid of a surface parameter
    Surface(String),
    /// 1.5: image id from `instance_image`
    Image(String),
}

/// A shared or unshared `<input>`.
struct Input {
    semantic: String,
    source: String,
    offset: usize,
    set: usize,
}

/// A `<source>` with a float array.
struct SourceData {
    values: Vec<f32>,
    stride: usize,
}

impl SourceData {
    fn vec3s(&self, node: Node) -> ParseResult<Vec<Vec3>> {
        if self.stride < 3 {
            return Err(parse_error(
                node,
                format!("source stride {} is too small for 3D data", self.stride),
            ));
        }
        self.check_length(node)?;
        Ok(self
            .values
            .chunks_exact(self.stride)
            .map(|c| Vec3::new(c[0], c[1], c[2]))
            .collect())
    }

    fn vec2s(&self, node: Node) -> ParseResult<Vec<Vec2>> {
        if self.stride < 2 {
            return Err(parse_error(
                node,
                format!("source stride {} is too small for texture coordinates", self.stride),
            ));
        }
        self.check_length(node)?;
        Ok(self
            .values
            .chunks_exact(self.stride)
            .map(|c| Vec2::new(c[0], c[1]))
            .collect())
    }

    fn check_length(&self, node: Node) -> ParseResult<()> {
        if self.values.len() % self.stride != 0 {
            return Err(parse_error(
                node,
                format!(
                    "{} source values is not a multiple of stride {}",
                    self.values.len(),
                    self.stride
                ),
            ));
        }
        Ok(())
    }
}

/// Internal state for building a document from XML elements.
struct Reader {
    document: ColladaDocument,
    images: HashMap<String, Arc<ImageRef>>,
    effects: HashMap<String, Arc<Effect>>,
    materials: HashMap<String, Arc<Material>>,
    geometries: HashMap<String, Arc<Geometry>>,
    visual_scenes: Vec<VisualScene>,
}

impl Reader {
    fn new(base_dir: PathBuf) -> Self {
        Self {
            document: ColladaDocument {
                base_dir,
                ..Default::default()
            },
            images: HashMap::new(),
            effects: HashMap::new(),
            materials: HashMap::new(),
            geometries: HashMap::new(),
            visual_scenes: Vec::new(),
        }
    }

    fn read_image(&mut self, node: Node) -> ParseResult<()> {
        let id = required_attribute(node, "id")?;

        let Some(init_from) = child(node, "init_from") else {
            log::warn!("Image '{}' has no <init_from>, skipping", id);
            return Ok(());
        };
        // COLLADA 1.5 wraps the path in <ref>
        let path = child(init_from, "ref").unwrap_or(init_from);

        let image = Arc::new(ImageRef {
            id: id.to_string(),
            path: text(path).to_string(),
        });
        self.images.insert(image.id.clone(), image.clone());
        self.document.images.push(image);
        Ok(())
    }

    fn read_effect(&mut self, node: Node) -> ParseResult<()> {
        let id = required_attribute(node, "id")?;

        let profile = child(node, "profile_COMMON").ok_or_else(|| {
            parse_error(node, format!("effect '{}' has no <profile_COMMON>", id))
        })?;

        let mut params = HashMap::new();
        for newparam in children(profile, "newparam") {
            let sid = required_attribute(newparam, "sid")?;
            if let Some(param) = read_param(newparam)? {
                params.insert(sid.to_string(), param);
            }
        }

        let technique = child(profile, "technique").ok_or_else(|| {
            parse_error(profile, format!("effect '{}' has no <technique>", id))
        })?;
        let shading = element_children(technique)
            .find(|n| !matches!(n.tag_name().name(), "asset" | "extra" | "image" | "newparam"))
            .ok_or_else(|| {
                parse_error(technique, format!("effect '{}' has no shading element", id))
            })?;

        let diffuse = match child(shading, "diffuse") {
            Some(diffuse) => self.read_diffuse(diffuse, &params)?,
            None => None,
        };

        let effect = Arc::new(Effect {
            id: id.to_string(),
            shading_type: shading.tag_name().name().to_string(),
            diffuse,
        });
        self.effects.insert(effect.id.clone(), effect.clone());
        self.document.effects.push(effect);
        Ok(())
    }

    fn read_diffuse(
        &self,
        node: Node,
        params: &HashMap<String, Param>,
    ) -> ParseResult<Option<DiffuseChannel>> {
        for value in element_children(node) {
            match value.tag_name().name() {
                "color" => {
                    let rgba = parse_floats(text(value))?;
                    if rgba.len() < 3 {
                        return Err(parse_error(value, "diffuse color needs at least 3 components"));
                    }
                    let alpha = rgba.get(3).copied().unwrap_or(1.0);
                    return Ok(Some(DiffuseChannel::Color([rgba[0], rgba[1], rgba[2], alpha])));
                }
                "texture" => {
                    let texture = required_attribute(value, "texture")?;
                    let sampler = self.resolve_sampler(value, texture, params)?;
                    return Ok(Some(DiffuseChannel::Map(TextureMap {
                        sampler,
                        texcoord: value.attribute("texcoord").unwrap_or_default().to_string(),
                    })));
                }
                other => {
                    log::debug!("Ignoring <{}> diffuse value (line {})", other, line_of(value));
                }
            }
        }
        Ok(None)
    }

    /// Follow sampler -> surface -> image for a `<texture texture="...">`.
    ///
    /// Some exporters name the image directly; that form is accepted too.
    fn resolve_sampler(
        &self,
        node: Node,
        texture: &str,
        params: &HashMap<String, Param>,
    ) -> ParseResult<Sampler2D> {
        if let Some(Param::Sampler(source)) = params.get(texture) {
            let surface = match source {
                SamplerSource::Surface(sid) => match params.get(sid) {
                    Some(Param::Surface { image }) => Surface {
                        sid: sid.clone(),
                        image: self.image(node, image)?,
                    },
                    _ => return Err(broken_reference(node, sid)),
                },
                SamplerSource::Image(image) => Surface {
                    sid: image.clone(),
                    image: self.image(node, image)?,
                },
            };
            return Ok(Sampler2D {
                sid: texture.to_string(),
                surface,
            });
        }

        let image = self.image(node, texture)?;
        Ok(Sampler2D {
            sid: texture.to_string(),
            surface: Surface {
                sid: texture.to_string(),
                image,
            },
        })
    }

    fn image(&self, node: Node, id: &str) -> ParseResult<Arc<ImageRef>> {
        self.images
            .get(id)
            .cloned()
            .ok_or_else(|| broken_reference(node, id))
    }

    fn read_material(&mut self, node: Node) -> ParseResult<()> {
        let id = required_attribute(node, "id")?;
        let instance_effect = child(node, "instance_effect").ok_or_else(|| {
            parse_error(node, format!("material '{}' has no <instance_effect>", id))
        })?;
        let url = required_attribute(instance_effect, "url")?;
        let effect = self
            .effects
            .get(fragment(url))
            .cloned()
            .ok_or_else(|| broken_reference(instance_effect, url))?;

        let material = Arc::new(Material {
            id: id.to_string(),
            name: node.attribute("name").map(str::to_string),
            effect,
        });
        self.materials.insert(material.id.clone(), material.clone());
        self.document.materials.push(material);
        Ok(())
    }

    fn read_geometry(&mut self, node: Node) -> ParseResult<()> {
        let id = required_attribute(node, "id")?;

        let primitives = match child(node, "mesh") {
            Some(mesh) => read_mesh(mesh)?,
            None => {
                log::debug!("Geometry '{}' has no <mesh>, it has no primitives", id);
                Vec::new()
            }
        };

        let geometry = Arc::new(Geometry {
            id: id.to_string(),
            name: node.attribute("name").map(str::to_string),
            primitives,
        });
        self.geometries.insert(geometry.id.clone(), geometry.clone());
        self.document.geometries.push(geometry);
        Ok(())
    }

    fn read_visual_scene<'a, 'input>(
        &mut self,
        node: Node<'a, 'input>,
        library: &NodeLibrary<'a, 'input>,
    ) -> ParseResult<()> {
        let mut geometry_nodes = Vec::new();
        let mut instancing = Vec::new();
        for scene_node in children(node, "node") {
            self.read_node(
                scene_node,
                Mat4::IDENTITY,
                library,
                &mut instancing,
                &mut geometry_nodes,
            )?;
        }

        self.visual_scenes.push(VisualScene {
            id: node.attribute("id").unwrap_or_default().to_string(),
            geometry_nodes,
        });
        Ok(())
    }

    /// Read a `<node>` and its descendants, collecting geometry instances in document order.
    ///
    /// `instance_node` references are expanded in place under the current
    /// transform. `instancing` holds the library nodes being expanded.
    fn read_node<'a, 'input>(
        &self,
        node: Node<'a, 'input>,
        parent: Mat4,
        library: &NodeLibrary<'a, 'input>,
        instancing: &mut Vec<&'a str>,
        out: &mut Vec<GeometryNode>,
    ) -> ParseResult<()> {
        let mut transforms = Vec::new();
        for element in element_children(node) {
            let transform = match element.tag_name().name() {
                "matrix" => NodeTransform::Matrix(parse_fixed::<16>(element)?),
                "translate" => NodeTransform::Translate(Vec3::from_array(parse_fixed(element)?)),
                "scale" => NodeTransform::Scale(Vec3::from_array(parse_fixed(element)?)),
                "rotate" => {
                    let [x, y, z, degrees] = parse_fixed::<4>(element)?;
                    NodeTransform::Rotate(Vec3::new(x, y, z), degrees)
                }
                "lookat" => {
                    let v = parse_fixed::<9>(element)?;
                    NodeTransform::Lookat(
                        Vec3::new(v[0], v[1], v[2]),
                        Vec3::new(v[3], v[4], v[5]),
                        Vec3::new(v[6], v[7], v[8]),
                    )
                }
                "skew" => {
                    log::debug!("Ignoring <skew> (line {})", line_of(element));
                    continue;
                }
                _ => continue,
            };
            transforms.push(transform);
        }
        let world = parent * compose_node_transforms(&transforms);

        for element in element_children(node) {
            match element.tag_name().name() {
                "instance_geometry" => {
                    out.push(self.read_instance_geometry(element, node.attribute("id"), world)?);
                }
                "node" => self.read_node(element, world, library, instancing, out)?,
                "instance_node" => {
                    let url = required_attribute(element, "url")?;
                    let id = fragment(url);
                    let target = *library
                        .get(id)
                        .ok_or_else(|| broken_reference(element, url))?;

                    if instancing.contains(&id) {
                        return Err(parse_error(
                            element,
                            format!("node '{}' instances itself", id),
                        ));
                    }
                    instancing.push(id);
                    self.read_node(target, world, library, instancing, out)?;
                    instancing.pop();
                }
                name @ ("instance_camera" | "instance_light" | "instance_controller") => {
                    log::debug!("Skipping <{}> (line {})", name, line_of(element));
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn read_instance_geometry(
        &self,
        node: Node,
        node_id: Option<&str>,
        world: Mat4,
    ) -> ParseResult<GeometryNode> {
        let url = required_attribute(node, "url")?;
        let geometry = self
            .geometries
            .get(fragment(url))
            .cloned()
            .ok_or_else(|| broken_reference(node, url))?;

        let mut material_bindings = BTreeMap::new();
        let technique = child(node, "bind_material").and_then(|b| child(b, "technique_common"));
        if let Some(technique) = technique {
            for instance in children(technique, "instance_material") {
                let symbol = required_attribute(instance, "symbol")?;
                let target = required_attribute(instance, "target")?;
                let material = self
                    .materials
                    .get(fragment(target))
                    .cloned()
                    .ok_or_else(|| broken_reference(instance, target))?;
                material_bindings.insert(symbol.to_string(), material);
            }
        }

        Ok(GeometryNode {
            node_id: node_id.map(str::to_string),
            geometry,
            matrix: world.transpose(),
            material_bindings,
        })
    }

    fn finish(mut self, root: Node) -> ParseResult<ColladaDocument> {
        let instance = child(root, "scene").and_then(|s| child(s, "instance_visual_scene"));

        let scene = match instance {
            Some(instance) => {
                let url = required_attribute(instance, "url")?;
                let index = self
                    .visual_scenes
                    .iter()
                    .position(|s| s.id == fragment(url))
                    .ok_or_else(|| broken_reference(instance, url))?;
                Some(self.visual_scenes.swap_remove(index))
            }
            None if !self.visual_scenes.is_empty() => Some(self.visual_scenes.remove(0)),
            None => None,
        };

        if scene.is_none() {
            log::warn!("Document has no visual scene");
        }
        self.document.scene = scene;
        Ok(self.document)
    }
}

fn read_param(node: Node) -> ParseResult<Option<Param>> {
    if let Some(surface) = child(node, "surface") {
        return Ok(child(surface, "init_from").map(|init_from| Param::Surface {
            image: text(init_from).to_string(),
        }));
    }

    if let Some(sampler) = child(node, "sampler2D") {
        if let Some(source) = child(sampler, "source") {
            return Ok(Some(Param::Sampler(SamplerSource::Surface(
                text(source).to_string(),
            ))));
        }
        if let Some(instance) = child(sampler, "instance_image") {
            let url = required_attribute(instance, "url")?;
            return Ok(Some(Param::Sampler(SamplerSource::Image(
                fragment(url).to_string(),
            ))));
        }
        return Err(parse_error(sampler, "<sampler2D> has no image source"));
    }

    Ok(None)
}

fn read_mesh(mesh: Node) -> ParseResult<Vec<Primitive>> {
    let mut sources = HashMap::new();
    let mut vertices = HashMap::new();

    for element in element_children(mesh) {
        match element.tag_name().name() {
            "source" => {
                let id = required_attribute(element, "id")?;
                sources.insert(id.to_string(), read_source(element)?);
            }
            "vertices" => {
                let id = required_attribute(element, "id")?;
                let inputs = children(element, "input")
                    .map(read_input)
                    .collect::<ParseResult<Vec<_>>>()?;
                vertices.insert(id.to_string(), inputs);
            }
            _ => {}
        }
    }

    let mut primitives = Vec::new();
    for element in element_children(mesh) {
        match element.tag_name().name() {
            "source" | "vertices" | "extra" => {}
            "triangles" => {
                let triset = read_triangles(element, &sources, &vertices)?;
                primitives.push(Primitive::TriangleSet(triset));
            }
            kind => primitives.push(Primitive::Unsupported {
                kind: kind.to_string(),
                material: element.attribute("material").map(str::to_string),
            }),
        }
    }
    Ok(primitives)
}

fn read_source(node: Node) -> ParseResult<SourceData> {
    let values = match child(node, "float_array") {
        Some(array) => parse_floats(text(array))?,
        None => Vec::new(),
    };

    let stride = child(node, "technique_common")
        .and_then(|t| child(t, "accessor"))
        .and_then(|a| a.attribute("stride"))
        .map(|s| parse_count(node, s))
        .transpose()?
        .unwrap_or(1)
        .max(1);

    Ok(SourceData { values, stride })
}

fn read_input(node: Node) -> ParseResult<Input> {
    let offset = node
        .attribute("offset")
        .map(|s| parse_count(node, s))
        .transpose()?
        .unwrap_or(0);
    let set = node
        .attribute("set")
        .map(|s| parse_count(node, s))
        .transpose()?
        .unwrap_or(0);

    Ok(Input {
        semantic: required_attribute(node, "semantic")?.to_string(),
        source: fragment(required_attribute(node, "source")?).to_string(),
        offset,
        set,
    })
}

fn read_triangles(
    node: Node,
    sources: &HashMap<String, SourceData>,
    vertices: &HashMap<String, Vec<Input>>,
) -> ParseResult<TriangleSet> {
    let inputs = children(node, "input")
        .map(read_input)
        .collect::<ParseResult<Vec<_>>>()?;
    let stride = inputs.iter().map(|i| i.offset + 1).max().unwrap_or(1);

    let source = |input: &Input| {
        sources
            .get(&input.source)
            .ok_or_else(|| broken_reference(node, &input.source))
    };

    let mut triset = TriangleSet {
        material: node.attribute("material").unwrap_or_default().to_string(),
        ..Default::default()
    };
    let mut vertex_offset = None;
    let mut normal = None;
    let mut texcoords = Vec::new();

    for input in &inputs {
        match input.semantic.as_str() {
            "VERTEX" => {
                let shared = vertices
                    .get(&input.source)
                    .ok_or_else(|| broken_reference(node, &input.source))?;
                for vertex_input in shared {
                    match vertex_input.semantic.as_str() {
                        "POSITION" => {
                            triset.vertex = source(vertex_input)?.vec3s(node)?;
                            vertex_offset = Some(input.offset);
                        }
                        "NORMAL" => {
                            normal = Some((source(vertex_input)?.vec3s(node)?, input.offset));
                        }
                        "TEXCOORD" => {
                            let pool = source(vertex_input)?.vec2s(node)?;
                            texcoords.push((vertex_input.set, pool, input.offset));
                        }
                        _ => {}
                    }
                }
            }
            "NORMAL" => normal = Some((source(input)?.vec3s(node)?, input.offset)),
            "TEXCOORD" => texcoords.push((input.set, source(input)?.vec2s(node)?, input.offset)),
            _ => {}
        }
    }

    let vertex_offset = vertex_offset
        .ok_or_else(|| parse_error(node, "<triangles> has no VERTEX input with POSITION"))?;

    let Some(p) = child(node, "p") else {
        return Ok(triset);
    };
    let indices = parse_indices(text(p))?;

    let corner_stride = stride * 3;
    if indices.len() % corner_stride != 0 {
        return Err(parse_error(
            p,
            format!(
                "{} indices is not a multiple of {} ({} inputs per corner)",
                indices.len(),
                corner_stride,
                stride
            ),
        ));
    }
    let triangle_count = indices.len() / corner_stride;

    let gather = |offset: usize| -> Vec<[u32; 3]> {
        (0..triangle_count)
            .map(|t| {
                let base = t * corner_stride + offset;
                [
                    indices[base],
                    indices[base + stride],
                    indices[base + 2 * stride],
                ]
            })
            .collect()
    };

    triset.vertex_index = Some(gather(vertex_offset));

    if let Some((pool, offset)) = normal {
        triset.normal = pool;
        triset.normal_index = Some(gather(offset));
    }

    // Stable sort keeps document order within a set
    texcoords.sort_by_key(|(set, _, _)| *set);
    for (_, pool, offset) in texcoords {
        triset.texcoordset.push(pool);
        triset.texcoord_indexset.push(gather(offset));
    }

    Ok(triset)
}

// =============================================================================
// XML helpers

fn element_children<'a, 'input: 'a>(
    node: Node<'a, 'input>,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(|n| n.is_element())
}

fn children<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    element_children(node).filter(move |n| n.tag_name().name() == name)
}

fn child<'a, 'input: 'a>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    element_children(node).find(|n| n.tag_name().name() == name)
}

fn text<'a>(node: Node<'a, '_>) -> &'a str {
    node.text().unwrap_or_default().trim()
}

fn required_attribute<'a>(node: Node<'a, '_>, name: &str) -> ParseResult<&'a str> {
    node.attribute(name).ok_or_else(|| {
        parse_error(
            node,
            format!("<{}> is missing attribute '{}'", node.tag_name().name(), name),
        )
    })
}

/// Strip the leading `#` of a local URI reference.
fn fragment(url: &str) -> &str {
    url.strip_prefix('#').unwrap_or(url)
}

fn line_of(node: Node) -> u32 {
    node.document().text_pos_at(node.range().start).row
}

fn parse_error(node: Node, message: impl Into<String>) -> ParseError {
    ParseError::Parse {
        line: line_of(node),
        message: message.into(),
    }
}

fn broken_reference(node: Node, reference: &str) -> ParseError {
    ParseError::BrokenReference {
        line: line_of(node),
        reference: reference.to_string(),
    }
}

fn parse_floats(text: &str) -> ParseResult<Vec<f32>> {
    text.split_whitespace()
        .map(|s| {
            s.parse::<f32>()
                .map_err(|_| ParseError::InvalidNumber(s.to_string()))
        })
        .collect()
}

fn parse_indices(text: &str) -> ParseResult<Vec<u32>> {
    text.split_whitespace()
        .map(|s| {
            s.parse::<u32>()
                .map_err(|_| ParseError::InvalidNumber(s.to_string()))
        })
        .collect()
}

fn parse_count(node: Node, value: &str) -> ParseResult<usize> {
    value
        .trim()
        .parse::<usize>()
        .map_err(|_| parse_error(node, format!("invalid count '{}'", value)))
}

/// Parse exactly `N` floats from an element's text.
fn parse_fixed<const N: usize>(node: Node) -> ParseResult<[f32; N]> {
    let values = parse_floats(text(node))?;
    values.try_into().map_err(|values: Vec<f32>| {
        parse_error(
            node,
            format!(
                "<{}> expects {} values, found {}",
                node.tag_name().name(),
                N,
                values.len()
            ),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collada::test_documents::{INSTANCED_NODES, TEXTURED_QUAD, TRIANGLE_PAIR};
    use daeport_math::Mat4Ext;

    #[test]
    fn test_parse_triangle_pair() {
        let doc = ColladaDocument::parse(TRIANGLE_PAIR, "/scenes").unwrap();

        assert_eq!(doc.base_dir, PathBuf::from("/scenes"));
        assert_eq!(doc.geometries.len(), 1);
        assert_eq!(doc.materials.len(), 1);

        let geometry = &doc.geometries[0];
        assert_eq!(geometry.id, "Quad-mesh");
        assert_eq!(geometry.primitives.len(), 1);

        let Primitive::TriangleSet(triset) = &geometry.primitives[0] else {
            panic!("expected a triangle set");
        };
        assert_eq!(triset.material, "RedSG");
        assert_eq!(triset.vertex.len(), 4);
        assert_eq!(triset.vertex[2], Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(triset.vertex_index, Some(vec![[0, 1, 2], [0, 2, 3]]));
        assert!(triset.normal_index.is_none());
        assert!(triset.texcoord_indexset.is_empty());

        let effect = &doc.materials[0].effect;
        assert_eq!(effect.shading_type, "lambert");
        assert!(matches!(
            effect.diffuse,
            Some(DiffuseChannel::Color(rgba)) if rgba == [1.0, 0.0, 0.0, 1.0]
        ));
    }

    #[test]
    fn test_scene_bindings_and_matrix() {
        let doc = ColladaDocument::parse(TRIANGLE_PAIR, "").unwrap();

        let nodes: Vec<_> = doc.geometry_nodes().collect();
        assert_eq!(nodes.len(), 1);

        let node = nodes[0];
        assert_eq!(node.node_id.as_deref(), Some("Quad"));
        assert!(Arc::ptr_eq(&node.geometry, doc.geometry("Quad-mesh").unwrap()));
        assert!(Arc::ptr_eq(
            &node.material_bindings["RedSG"],
            doc.material("Red").unwrap()
        ));
        assert_eq!(node.matrix, Mat4::IDENTITY);
    }

    #[test]
    fn test_parse_textured_quad() {
        let doc = ColladaDocument::parse(TEXTURED_QUAD, "").unwrap();

        let Primitive::TriangleSet(triset) = &doc.geometries[0].primitives[0] else {
            panic!("expected a triangle set");
        };
        // VERTEX offset 0, NORMAL offset 1, TEXCOORD offset 2
        assert_eq!(triset.vertex_index, Some(vec![[1, 2, 0], [2, 3, 0]]));
        assert_eq!(triset.normal_index, Some(vec![[0, 0, 0], [0, 0, 0]]));
        assert_eq!(triset.normal, vec![Vec3::Z]);
        assert_eq!(triset.texcoordset.len(), 1);
        assert_eq!(triset.texcoord_indexset[0], vec![[1, 2, 0], [2, 3, 0]]);
        assert_eq!(triset.texcoordset[0][2], Vec2::new(1.0, 1.0));

        let Some(DiffuseChannel::Map(map)) = &doc.materials[0].effect.diffuse else {
            panic!("expected a texture map");
        };
        assert_eq!(map.sampler.sid, "checker-sampler");
        assert_eq!(map.sampler.surface.sid, "checker-surface");
        assert_eq!(map.image_path(), "textures/checker.png");
        assert_eq!(map.texcoord, "UVMap");

        // Unsupported primitive kept with its kind
        assert!(matches!(
            &doc.geometries[0].primitives[1],
            Primitive::Unsupported { kind, .. } if kind == "lines"
        ));
    }

    #[test]
    fn test_node_hierarchy_transform() {
        let doc = ColladaDocument::parse(TEXTURED_QUAD, "").unwrap();
        let node = doc.geometry_nodes().next().unwrap();

        // Parent translates by (10, 0, 0), child by (0, 5, 0)
        let world = node.matrix.transpose();
        let origin = world.transform_point3(Vec3::ZERO);
        assert!((origin - Vec3::new(10.0, 5.0, 0.0)).length() < 0.001);

        // Document layout keeps the translation in the last row
        assert_eq!(node.matrix.to_row_major()[12..15], [10.0, 5.0, 0.0]);
    }

    #[test]
    fn test_texture_names_image_directly() {
        let dae = r##"<COLLADA>
  <library_images><image id="tex"><init_from><ref>wood.png</ref></init_from></image></library_images>
  <library_effects>
    <effect id="fx"><profile_COMMON><technique sid="common"><phong>
      <diffuse><texture texture="tex" texcoord="uv0"/></diffuse>
    </phong></technique></profile_COMMON></effect>
  </library_effects>
</COLLADA>"##;
        let doc = ColladaDocument::parse(dae, "").unwrap();

        let Some(DiffuseChannel::Map(map)) = &doc.effects[0].diffuse else {
            panic!("expected a texture map");
        };
        assert_eq!(map.image_path(), "wood.png");
        assert!(doc.scene.is_none());
    }

    #[test]
    fn test_broken_material_reference() {
        let dae = r##"<COLLADA>
  <library_materials>
    <material id="m"><instance_effect url="#missing"/></material>
  </library_materials>
</COLLADA>"##;
        let err = ColladaDocument::parse(dae, "").unwrap_err();
        assert!(matches!(
            err,
            ParseError::BrokenReference { line: 3, ref reference } if reference == "#missing"
        ));
    }

    #[test]
    fn test_bad_index_count() {
        let dae = r##"<COLLADA>
  <library_geometries><geometry id="g"><mesh>
    <source id="pos"><float_array count="9">0 0 0 1 0 0 0 1 0</float_array>
      <technique_common><accessor source="#pos-array" count="3" stride="3"/></technique_common>
    </source>
    <vertices id="verts"><input semantic="POSITION" source="#pos"/></vertices>
    <triangles count="1"><input semantic="VERTEX" source="#verts" offset="0"/><p>0 1</p></triangles>
  </mesh></geometry></library_geometries>
</COLLADA>"##;
        let err = ColladaDocument::parse(dae, "").unwrap_err();
        assert!(matches!(err, ParseError::Parse { line: 7, .. }));
    }

    #[test]
    fn test_triangles_without_p() {
        let dae = r##"<COLLADA>
  <library_geometries><geometry id="g"><mesh>
    <source id="pos"><float_array count="3">0 0 0</float_array>
      <technique_common><accessor source="#pos-array" count="1" stride="3"/></technique_common>
    </source>
    <vertices id="verts"><input semantic="POSITION" source="#pos"/></vertices>
    <triangles count="0" material="m"><input semantic="VERTEX" source="#verts" offset="0"/></triangles>
  </mesh></geometry></library_geometries>
</COLLADA>"##;
        let doc = ColladaDocument::parse(dae, "").unwrap();
        let Primitive::TriangleSet(triset) = &doc.geometries[0].primitives[0] else {
            panic!("expected a triangle set");
        };
        assert!(triset.vertex_index.is_none());
        assert_eq!(triset.vertex.len(), 1);
    }

    #[test]
    fn test_invalid_documents() {
        assert!(matches!(
            ColladaDocument::parse("<COLLADA>", ""),
            Err(ParseError::Xml(_))
        ));
        assert!(matches!(
            ColladaDocument::parse("<gltf/>", ""),
            Err(ParseError::Parse { line: 1, .. })
        ));
        assert!(matches!(
            parse_floats("1.0 abc"),
            Err(ParseError::InvalidNumber(s)) if s == "abc"
        ));
    }

    #[test]
    fn test_instance_node_expands_library_node() {
        let doc = ColladaDocument::parse(INSTANCED_NODES, "").unwrap();

        let nodes: Vec<_> = doc.geometry_nodes().collect();
        assert_eq!(nodes.len(), 2);

        let positions: Vec<Vec3> = nodes
            .iter()
            .map(|node| node.matrix.transpose().transform_point3(Vec3::ZERO))
            .collect();
        assert!((positions[0] - Vec3::new(5.0, 0.0, 1.0)).length() < 0.001);
        assert!((positions[1] - Vec3::new(0.0, 3.0, 1.0)).length() < 0.001);

        assert_eq!(nodes[0].node_id.as_deref(), Some("Tri-component"));
        assert!(Arc::ptr_eq(&nodes[0].geometry, &nodes[1].geometry));
    }

    #[test]
    fn test_instance_node_errors() {
        let missing = INSTANCED_NODES.replace(
            r##"<instance_node url="#Tri-component"/>"##,
            r##"<instance_node url="#Nowhere"/>"##,
        );
        assert!(matches!(
            ColladaDocument::parse(&missing, ""),
            Err(ParseError::BrokenReference { ref reference, .. }) if reference == "#Nowhere"
        ));

        let cyclic = INSTANCED_NODES.replace(
            r##"<instance_geometry url="#Tri-mesh"/>"##,
            r##"<instance_node url="#Tri-component"/>"##,
        );
        assert!(matches!(
            ColladaDocument::parse(&cyclic, ""),
            Err(ParseError::Parse { .. })
        ));
    }

    #[test]
    fn test_source_length_must_match_stride() {
        let dae = r##"<COLLADA>
  <library_geometries><geometry id="g"><mesh>
    <source id="pos"><float_array count="8">0 0 0 1 0 0 0 1</float_array>
      <technique_common><accessor source="#pos-array" count="3" stride="3"/></technique_common>
    </source>
    <vertices id="verts"><input semantic="POSITION" source="#pos"/></vertices>
    <triangles count="1"><input semantic="VERTEX" source="#verts" offset="0"/><p>0 1 2</p></triangles>
  </mesh></geometry></library_geometries>
</COLLADA>"##;
        let err = ColladaDocument::parse(dae, "").unwrap_err();
        assert!(matches!(err, ParseError::Parse { line: 7, .. }));
    }

    #[test]
    fn test_open_missing_file() {
        let err = ColladaDocument::open("/nonexistent/scene.dae").unwrap_err();
        assert!(matches!(err, ParseError::Io(_)));
    }
}
