//! Catalog of the RPC methods served by the editor extension.
//!
//! The constants exist so call sites and tests can name methods without
//! scattering string literals. The catalog is advisory: the client sends
//! any method name as-is, and the server is the authority on what it
//! supports (unknown methods come back as `E_NOT_FOUND`).

// ── Bridge ──────────────────────────────────────────────────────────

/// Liveness probe; returns protocol and workspace identity.
pub const BRIDGE_PING: &str = "bridge.ping";
/// Capability discovery for the connected editor.
pub const BRIDGE_CAPABILITIES: &str = "bridge.capabilities";

// ── Events ──────────────────────────────────────────────────────────

/// Open an event subscription on the current connection.
pub const EVENTS_SUBSCRIBE: &str = "events.subscribe";
/// Close a previously opened subscription.
pub const EVENTS_UNSUBSCRIBE: &str = "events.unsubscribe";

/// Method name on server-pushed event frames. Not callable; this is what
/// a streaming connection receives between subscribe and unsubscribe.
pub const EVENTS_NOTIFICATION: &str = "events.notification";

// ── Agent ───────────────────────────────────────────────────────────

/// Ask the editor-side agent to suggest next steps.
pub const AGENT_SUGGEST_NEXT_STEPS: &str = "agent.suggestNextSteps";
/// Ask the editor-side agent to plan and execute a goal.
pub const AGENT_PLAN_AND_EXECUTE: &str = "agent.planAndExecute";

// ── Transactions ────────────────────────────────────────────────────

/// Begin an editing transaction.
pub const TX_BEGIN: &str = "tx.begin";
/// Snapshot workspace state inside a transaction.
pub const TX_SNAPSHOT_CREATE: &str = "tx.snapshot.create";
/// Restore a previously created snapshot.
pub const TX_SNAPSHOT_RESTORE: &str = "tx.snapshot.restore";
/// Preview the accumulated changes of a transaction.
pub const TX_PREVIEW: &str = "tx.preview";
/// Commit a transaction.
pub const TX_COMMIT: &str = "tx.commit";
/// Roll a transaction back.
pub const TX_ROLLBACK: &str = "tx.rollback";

// ── Workspace ───────────────────────────────────────────────────────

/// Workspace folders, name, and open-editor summary.
pub const WORKSPACE_INFO: &str = "workspace.info";

// ── Diagnostics ─────────────────────────────────────────────────────

/// List current diagnostics, grouped by file.
pub const DIAGNOSTICS_LIST: &str = "diagnostics.list";
/// Subscribe this connection to diagnostics pushes.
pub const DIAGNOSTICS_SUBSCRIBE: &str = "diagnostics.subscribe";
/// Preview the code actions available for one diagnostic.
pub const DIAGNOSTICS_FIX_PREVIEW: &str = "diagnostics.fix.preview";
/// Apply one previewed fix.
pub const DIAGNOSTICS_FIX_COMMIT: &str = "diagnostics.fix.commit";

// ── Documents ───────────────────────────────────────────────────────

/// Read a document's text and metadata.
pub const DOC_READ: &str = "doc.read";
/// Preview a batch of text edits without applying them.
pub const DOC_APPLY_EDITS_PREVIEW: &str = "doc.applyEdits.preview";
/// Apply a previously previewed batch of edits.
pub const DOC_APPLY_EDITS_COMMIT: &str = "doc.applyEdits.commit";
/// Apply a batch of text edits in one step.
pub const DOC_APPLY_EDITS: &str = "doc.applyEdits";
/// Run the editor's formatter on a document.
pub const DOC_FORMAT: &str = "doc.format";

// ── Tasks ───────────────────────────────────────────────────────────

/// List configured workspace tasks.
pub const TASKS_LIST: &str = "tasks.list";
/// Run a task fire-and-forget.
pub const TASKS_RUN: &str = "tasks.run";
/// Run a task and capture its terminal output.
pub const TASKS_RUN_CAPTURE: &str = "tasks.run.capture";
/// Terminate a running task.
pub const TASKS_TERMINATE: &str = "tasks.terminate";

// ── Code intelligence ───────────────────────────────────────────────

/// Go-to-definition at a position.
pub const CODE_DEFINITIONS: &str = "code.definitions";
/// Find references at a position.
pub const CODE_REFERENCES: &str = "code.references";
/// Symbol outline of one document.
pub const CODE_SYMBOLS_DOCUMENT: &str = "code.symbols.document";
/// Workspace-wide symbol search.
pub const CODE_SYMBOLS_WORKSPACE: &str = "code.symbols.workspace";
/// Hover information at a position.
pub const CODE_HOVER: &str = "code.hover";

// ── UI ──────────────────────────────────────────────────────────────

/// Open a file in an editor tab.
pub const UI_OPEN_FILE: &str = "ui.openFile";
/// Reveal and highlight a range.
pub const UI_REVEAL_RANGE: &str = "ui.revealRange";
/// Focus the editor window.
pub const UI_FOCUS: &str = "ui.focus";
/// Open a named UI panel.
pub const UI_OPEN_PANEL: &str = "ui.openPanel";
/// Show a quick-pick list and return the user's choice.
pub const UI_QUICK_PICK: &str = "ui.quickPick";

// ── Debugging ───────────────────────────────────────────────────────

/// List active debug sessions.
pub const DEBUG_SESSIONS: &str = "debug.sessions";
/// Start a debug session.
pub const DEBUG_START: &str = "debug.start";
/// Stop a debug session.
pub const DEBUG_STOP: &str = "debug.stop";
/// Subscribe this connection to debug-event pushes.
pub const DEBUG_SUBSCRIBE: &str = "debug.subscribe";
/// Run one test under the debugger and capture the failure state.
pub const DEBUG_RUN_TEST_AND_CAPTURE_FAILURE: &str = "debug.runTestAndCaptureFailure";

// ── Notebooks ───────────────────────────────────────────────────────

/// Open a notebook document.
pub const NOTEBOOK_OPEN: &str = "notebook.open";
/// Read notebook cells and outputs.
pub const NOTEBOOK_READ: &str = "notebook.read";
/// Execute a range of notebook cells.
pub const NOTEBOOK_EXECUTE_CELLS: &str = "notebook.executeCells";

// ── Refactoring ─────────────────────────────────────────────────────

/// Rename a symbol in one step.
pub const REFACTOR_RENAME: &str = "refactor.rename";
/// Preview a symbol rename.
pub const REFACTOR_RENAME_PREVIEW: &str = "refactor.rename.preview";
/// Apply a previously previewed rename.
pub const REFACTOR_RENAME_COMMIT: &str = "refactor.rename.commit";
/// List code actions for a range.
pub const REFACTOR_CODE_ACTIONS: &str = "refactor.codeActions";
/// Apply one listed code action.
pub const REFACTOR_CODE_ACTIONS_APPLY: &str = "refactor.codeActions.apply";
/// Organize imports in a document.
pub const REFACTOR_ORGANIZE_IMPORTS: &str = "refactor.organizeImports";
/// Apply all safe fixes in a document.
pub const REFACTOR_FIX_ALL: &str = "refactor.fixAll";

// ── Symbols ─────────────────────────────────────────────────────────

/// Deep semantic context around a symbol.
pub const SYMBOLS_DEEP_CONTEXT: &str = "symbols.deepContext";

/// Every callable method in the current protocol revision.
pub const METHODS: &[&str] = &[
    BRIDGE_PING,
    BRIDGE_CAPABILITIES,
    EVENTS_SUBSCRIBE,
    EVENTS_UNSUBSCRIBE,
    AGENT_SUGGEST_NEXT_STEPS,
    AGENT_PLAN_AND_EXECUTE,
    TX_BEGIN,
    TX_SNAPSHOT_CREATE,
    TX_SNAPSHOT_RESTORE,
    TX_PREVIEW,
    TX_COMMIT,
    TX_ROLLBACK,
    WORKSPACE_INFO,
    DIAGNOSTICS_LIST,
    DIAGNOSTICS_SUBSCRIBE,
    DIAGNOSTICS_FIX_PREVIEW,
    DIAGNOSTICS_FIX_COMMIT,
    DOC_READ,
    DOC_APPLY_EDITS_PREVIEW,
    DOC_APPLY_EDITS_COMMIT,
    DOC_APPLY_EDITS,
    DOC_FORMAT,
    TASKS_LIST,
    TASKS_RUN,
    TASKS_RUN_CAPTURE,
    TASKS_TERMINATE,
    CODE_DEFINITIONS,
    CODE_REFERENCES,
    CODE_SYMBOLS_DOCUMENT,
    CODE_SYMBOLS_WORKSPACE,
    CODE_HOVER,
    UI_OPEN_FILE,
    UI_REVEAL_RANGE,
    UI_FOCUS,
    UI_OPEN_PANEL,
    UI_QUICK_PICK,
    DEBUG_SESSIONS,
    DEBUG_START,
    DEBUG_STOP,
    DEBUG_SUBSCRIBE,
    NOTEBOOK_OPEN,
    NOTEBOOK_READ,
    NOTEBOOK_EXECUTE_CELLS,
    REFACTOR_RENAME,
    REFACTOR_RENAME_PREVIEW,
    REFACTOR_RENAME_COMMIT,
    REFACTOR_CODE_ACTIONS,
    REFACTOR_CODE_ACTIONS_APPLY,
    REFACTOR_ORGANIZE_IMPORTS,
    REFACTOR_FIX_ALL,
    SYMBOLS_DEEP_CONTEXT,
    DEBUG_RUN_TEST_AND_CAPTURE_FAILURE,
];

/// Whether `method` is part of the current protocol revision.
pub fn is_known(method: &str) -> bool {
    METHODS.contains(&method)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
