//! Front-end pipeline.
//!
//! ```text
//! CstNode (JSON document from the grammar)
//!     │
//!     ▼
//! build ─► SourceUnit (ids, spans, descriptions known so far)
//!     │
//!     ▼
//! resolve_forward_references ─► SourceUnit + ResolutionReport
//!     │
//!     ├─► emit json | envelope
//!     ├─► IR (solace-ir)
//!     └─► ABI (solace-abi)
//! ```
//!
//! Every run owns its own id generator and resolver, so independent runs can
//! proceed concurrently without sharing state.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use solace_abi::Method;
use solace_ast::serialize::{from_bytes, from_json, to_bytes, to_json_pretty};
use solace_ast::{AstNode, BuildError, BuiltAst, CodecError, Node};
use solace_cst::CstNode;
use solace_ir::{IrError, RootSourceUnit};
use tracing::{info, warn};

pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Display, Debug, From)]
#[display("{kind}")]
pub struct PipelineError {
    #[from]
    kind: Box<PipelineErrorKind>,
}

impl<E> From<E> for PipelineError
where
    PipelineErrorKind: From<E>,
{
    fn from(error: E) -> Self {
        PipelineError {
            kind: Box::new(PipelineErrorKind::from(error)),
        }
    }
}

impl PipelineError {
    pub fn kind(&self) -> &PipelineErrorKind {
        &self.kind
    }

    fn io(path: &Path, error: std::io::Error) -> Self {
        PipelineErrorKind::Io {
            path: path.to_path_buf(),
            error,
        }
        .into()
    }
}

#[derive(Display, Debug)]
pub enum PipelineErrorKind {
    #[display("cannot access {}: {error}", path.display())]
    Io { path: PathBuf, error: std::io::Error },

    #[display("invalid parse tree: {_0}")]
    ParseTree(serde_json::Error),

    #[display("build failed: {_0}")]
    Build(BuildError),

    #[display("{_0}")]
    Codec(CodecError),

    #[display("IR generation failed: {_0}")]
    Ir(IrError),

    #[display("ABI generation failed: {_0}")]
    Abi(solace_abi::AbiError),

    #[display("no contract named `{_0}`")]
    UnknownContract(String),
}

impl From<BuildError> for PipelineErrorKind {
    fn from(error: BuildError) -> Self {
        PipelineErrorKind::Build(error)
    }
}

impl From<CodecError> for PipelineErrorKind {
    fn from(error: CodecError) -> Self {
        PipelineErrorKind::Codec(error)
    }
}

impl From<IrError> for PipelineErrorKind {
    fn from(error: IrError) -> Self {
        PipelineErrorKind::Ir(error)
    }
}

impl From<solace_abi::AbiError> for PipelineErrorKind {
    fn from(error: solace_abi::AbiError) -> Self {
        PipelineErrorKind::Abi(error)
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &*self.kind {
            PipelineErrorKind::Io { error, .. } => Some(error),
            PipelineErrorKind::ParseTree(error) => Some(error),
            PipelineErrorKind::Build(error) => Some(error),
            PipelineErrorKind::Codec(error) => Some(error),
            PipelineErrorKind::Ir(error) => Some(error),
            PipelineErrorKind::Abi(error) => Some(error),
            PipelineErrorKind::UnknownContract(_) => None,
        }
    }
}

/// Output form of `build`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Emit {
    /// Structured JSON document.
    #[default]
    Json,
    /// MessagePack envelope.
    Envelope,
    /// JSON rendering of the IR.
    Ir,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildOptions {
    pub resolve_forward_references: bool,
    pub emit: Emit,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            resolve_forward_references: true,
            emit: Emit::Json,
        }
    }
}

/// Read a parse tree the grammar serialized as JSON.
pub fn load_parse_tree(path: &Path) -> PipelineResult<CstNode> {
    let text = std::fs::read_to_string(path).map_err(|error| PipelineError::io(path, error))?;
    serde_json::from_str(&text).map_err(|error| PipelineErrorKind::ParseTree(error).into())
}

pub fn build(root: &CstNode, options: &BuildOptions) -> PipelineResult<BuiltAst> {
    info!("building AST (resolve_forward_references={})", options.resolve_forward_references);
    let built = solace_ast::build_with(root, options.resolve_forward_references)?;
    if !built.diagnostics.is_empty() {
        warn!("{} unresolved reference(s)", built.diagnostics.len());
    }
    info!("built {} node(s)", built.node_count);
    Ok(built)
}

pub fn build_ir(built: &BuiltAst) -> PipelineResult<RootSourceUnit> {
    info!("generating IR");
    Ok(solace_ir::Builder::new().build(&built.unit)?)
}

/// Encode a built tree in the requested form.
pub fn emit(built: &BuiltAst, emit: Emit) -> PipelineResult<Vec<u8>> {
    info!("emitting {:?}", emit);
    match emit {
        Emit::Json => Ok(to_json_pretty(&built.unit)?.into_bytes()),
        Emit::Envelope => Ok(to_bytes(&built.unit)?),
        Emit::Ir => {
            let ir = build_ir(built)?;
            let json = serde_json::to_string_pretty(&ir).map_err(CodecError::from)?;
            Ok(json.into_bytes())
        }
    }
}

/// ABI entries per contract, or for one contract when `contract` names it.
pub fn abi(
    built: &BuiltAst,
    contract: Option<&str>,
) -> PipelineResult<BTreeMap<String, Vec<Method>>> {
    let ir = build_ir(built)?;
    info!("generating ABI");
    let builder = solace_abi::Builder::new();

    let contracts: Vec<_> = match contract {
        Some(name) => vec![
            ir.contract(name)
                .ok_or_else(|| PipelineErrorKind::UnknownContract(name.to_string()))?,
        ],
        None => ir.contracts.iter().collect(),
    };

    contracts
        .into_iter()
        .map(|contract| Ok((contract.name.clone(), builder.build_contract(contract)?)))
        .collect()
}

/// Decode a serialized tree, sniffing JSON against MessagePack.
pub fn decode(bytes: &[u8]) -> PipelineResult<Node> {
    let is_json = bytes
        .iter()
        .find(|byte| !byte.is_ascii_whitespace())
        .is_some_and(|byte| *byte == b'{');
    let node = if is_json {
        let text = std::str::from_utf8(bytes)
            .map_err(|error| CodecError::MalformedEnvelope(error.to_string()))?;
        from_json(text)?
    } else {
        from_bytes(bytes)?
    };
    info!("decoded {}", node.node_type());
    Ok(node)
}

pub fn read(path: &Path) -> PipelineResult<Vec<u8>> {
    std::fs::read(path).map_err(|error| PipelineError::io(path, error))
}

pub fn write(path: &Path, bytes: &[u8]) -> PipelineResult<()> {
    std::fs::write(path, bytes).map_err(|error| PipelineError::io(path, error))
}

/// Write to standard output, or any other stream. Failures surface as
/// [`PipelineErrorKind::Io`] naming `<stdout>`.
pub fn write_stream(mut out: impl Write, bytes: &[u8]) -> PipelineResult<()> {
    let stdout = Path::new("<stdout>");
    out.write_all(bytes)
        .and_then(|()| out.flush())
        .map_err(|error| PipelineError::io(stdout, error))
}
