//! Shader module stand-in.
//!
//! Consumes `shader.wgsl` and `nuero.png` the way the graphics module does:
//! subscribes on start and checks each new version before accepting it. A
//! rejected version is reported and the previously accepted one stays
//! current. Nothing is compiled or rendered.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{Context, Result, bail};

use super::Module;
use crate::host::Host;

pub const SHADER: &str = "shader.wgsl";
pub const TEXTURE: &str = "nuero.png";

/// Entry points the render pipeline binds
const ENTRY_POINTS: [&str; 2] = ["vs_main", "fs_main"];

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Accepted resource versions
#[derive(Debug, Default)]
pub struct Loaded {
    pub shader: Option<String>,
    pub shader_loads: usize,
    pub texture_bytes: Option<usize>,
}

#[derive(Debug, Default)]
pub struct ShaderModule {
    loaded: Rc<RefCell<Loaded>>,
}

impl ShaderModule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared view of what has been accepted so far
    pub fn loaded(&self) -> Rc<RefCell<Loaded>> {
        Rc::clone(&self.loaded)
    }
}

impl Module for ShaderModule {
    fn name(&self) -> &str {
        "shader"
    }

    async fn start(&mut self, host: &mut Host) -> Result<()> {
        let resources = host.list_resources();
        crate::log!("module"; "resources: {}", resources.join(", "));

        if !resources.iter().any(|name| name == SHADER) {
            bail!("`{SHADER}` is not in the resource catalog");
        }

        let loaded = Rc::clone(&self.loaded);
        host.subscribe(SHADER, move |name, content| {
            let source = check_shader(name, content)?;
            let mut loaded = loaded.borrow_mut();
            loaded.shader = Some(source.to_owned());
            loaded.shader_loads += 1;
            crate::logger::status_success(&format!(
                "{name} loaded ({} bytes, version {})",
                content.len(),
                loaded.shader_loads
            ));
            Ok(())
        });

        if resources.iter().any(|name| name == TEXTURE) {
            let loaded = Rc::clone(&self.loaded);
            host.subscribe(TEXTURE, move |name, content| {
                check_texture(name, content)?;
                loaded.borrow_mut().texture_bytes = Some(content.len());
                crate::debug!("module"; "{} loaded ({} bytes)", name, content.len());
                Ok(())
            });
        }

        Ok(())
    }
}

/// Decode a shader source and check it declares the pipeline entry points.
fn check_shader<'a>(name: &str, content: &'a [u8]) -> Result<&'a str> {
    let source = std::str::from_utf8(content).with_context(|| format!("`{name}` is not UTF-8"))?;
    for entry in ENTRY_POINTS {
        if !declares_fn(source, entry) {
            bail!("`{name}` has no `{entry}` entry point");
        }
    }
    Ok(source)
}

/// Whether `source` contains `fn <entry>` followed by `(`, ignoring whitespace.
fn declares_fn(source: &str, entry: &str) -> bool {
    source.match_indices("fn").any(|(at, _)| {
        let rest = source[at + 2..].trim_start();
        rest.strip_prefix(entry)
            .is_some_and(|after| after.trim_start().starts_with('('))
    })
}

fn check_texture(name: &str, content: &[u8]) -> Result<()> {
    if !content.starts_with(&PNG_SIGNATURE) {
        bail!("`{name}` is not a PNG image");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{Delivery, EditBridge, ResourceRegistry};

    const VALID: &str = "@vertex\nfn vs_main(@builtin(vertex_index) i: u32) -> @builtin(position) vec4<f32> {}\n\
                         @fragment\nfn fs_main() -> @location(0) vec4<f32> {}\n";

    fn png() -> Vec<u8> {
        let mut bytes = PNG_SIGNATURE.to_vec();
        bytes.extend_from_slice(b"IHDR");
        bytes
    }

    fn host_with(
        resources: Vec<(&'static str, Vec<u8>)>,
    ) -> (Host, Rc<RefCell<Vec<String>>>) {
        let reports = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&reports);
        let host = Host::new(ResourceRegistry::from_resources(resources), move |m: &str| {
            sink.borrow_mut().push(m.to_string())
        });
        (host, reports)
    }

    #[test]
    fn test_declares_fn() {
        assert!(declares_fn("fn vs_main() {}", "vs_main"));
        assert!(declares_fn("fn  vs_main  (x: u32) {}", "vs_main"));
        assert!(!declares_fn("fn vs_main_alt() {}", "vs_main"));
        assert!(!declares_fn("// vs_main", "vs_main"));
    }

    #[test]
    fn test_check_shader() {
        assert!(check_shader(SHADER, VALID.as_bytes()).is_ok());

        let err = check_shader(SHADER, b"fn vs_main() {}").unwrap_err();
        assert!(err.to_string().contains("fs_main"));

        let err = check_shader(SHADER, &[0xff, 0xfe]).unwrap_err();
        assert!(err.to_string().contains("UTF-8"));
    }

    #[test]
    fn test_check_texture() {
        assert!(check_texture(TEXTURE, &png()).is_ok());
        assert!(check_texture(TEXTURE, b"GIF89a").is_err());
    }

    #[tokio::test]
    async fn test_start_loads_initial_content() {
        let (mut host, reports) = host_with(vec![
            (TEXTURE, png()),
            (SHADER, VALID.as_bytes().to_vec()),
        ]);
        let mut module = ShaderModule::new();

        host.initialize(&mut module).await.unwrap();

        let loaded = module.loaded();
        assert_eq!(loaded.borrow().shader.as_deref(), Some(VALID));
        assert_eq!(loaded.borrow().shader_loads, 1);
        assert_eq!(loaded.borrow().texture_bytes, Some(png().len()));
        assert!(reports.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_start_without_shader_fails() {
        let (mut host, reports) = host_with(vec![(TEXTURE, png())]);
        let mut module = ShaderModule::new();

        assert!(host.initialize(&mut module).await.is_err());
        assert!(!host.is_running());
        assert!(reports.borrow()[0].contains("resource catalog"));
    }

    #[tokio::test]
    async fn test_rejected_edit_keeps_previous_shader() {
        let (mut host, reports) = host_with(vec![(SHADER, VALID.as_bytes().to_vec())]);
        let mut module = ShaderModule::new();
        host.initialize(&mut module).await.unwrap();

        let mut bridge = EditBridge::new(SHADER);
        let delivery = bridge.document_changed(&mut host, "fn vs_main() {}");

        assert_eq!(delivery, Delivery::Failed);
        assert!(reports.borrow()[0].contains("fs_main"));
        let loaded = module.loaded();
        assert_eq!(loaded.borrow().shader.as_deref(), Some(VALID));

        // A fixed version is accepted again
        let fixed = format!("{VALID}\n// edited");
        assert_eq!(bridge.document_changed(&mut host, &fixed), Delivery::Delivered);
        assert_eq!(loaded.borrow().shader_loads, 2);
    }
}
