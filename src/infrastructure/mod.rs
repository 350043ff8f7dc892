pub mod collaborators;

pub use collaborators::{
    export_file_name, AssembledDocument, DocumentAssembler, ExportRequest, SectionGenerator,
    TemplateAnalyzer,
};
