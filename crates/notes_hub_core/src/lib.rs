pub mod authoring;
pub mod browse;
pub mod chat;
pub mod detail;
pub mod domain;
pub mod ingestion;
pub mod ports;
pub mod seed;
pub mod store;
pub mod workspace;

pub use authoring::{AuthoringForm, FormError};
pub use browse::{student_view, teacher_view, BrowseView, EmptyState, NoteFilter, SubjectGroup};
pub use chat::{ChatGateway, ChatPanel, ChatPanelError};
pub use detail::{DetailView, SaveError, SaveIndicator, SaveStatus, SaveTicket};
pub use domain::{ChatMessage, ChatRole, FileType, Note, NoteDraft, UserRole};
pub use ingestion::{ingest, IngestError, IngestedFile, SelectedFile};
pub use ports::{ChatService, PortError, PortResult};
pub use store::NoteStore;
pub use workspace::{Workspace, WorkspaceError};
