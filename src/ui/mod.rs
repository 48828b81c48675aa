//! UI components for ScriptShot

pub mod block_editor;
pub mod block_renderer;
pub mod code_editor;
pub mod feed;
pub mod highlight;
pub mod post_card;
pub mod post_view;
pub mod profile;
pub mod sidebar;
pub mod sign_in;
pub mod thumbnail;
pub mod typewriter;

use block_renderer::BlockAction;

/// Where a page asks the app to go next
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// The feed, reloaded from the store
    Feed,
    ComposeCode,
    ComposeBlocks,
    /// A single post by id
    Post(String),
    /// A user's profile by user id
    Profile(String),
    SignIn,
    SignOut,
    /// Open a link in the system browser
    OpenUrl(String),
}

impl From<BlockAction> for Route {
    fn from(action: BlockAction) -> Self {
        match action {
            BlockAction::OpenUrl(url) => Route::OpenUrl(url),
        }
    }
}
