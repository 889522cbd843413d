//! The signed-in user's own profile screen.

use std::sync::Arc;

use super::posts::{apply_refresh, remove_from, PostActions, PostListState};
use super::refresh::RefreshEvent;
use super::screen::{Input, Screen, ScreenState};
use super::session::{SessionEvent, SessionManager};
use super::tabs::{HasTabbedPosts, TabLoader, TabbedPosts};
use crate::domain::MessageQueue;
use crate::error::{messages, ScreenError};
use crate::interactors::GetAccount;
use crate::models::{Account, Post};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountState {
    pub is_loading: bool,
    pub account: Option<Account>,
    pub tabs: TabbedPosts,
    pub queue: MessageQueue,
}

impl ScreenState for AccountState {
    fn queue(&self) -> &MessageQueue {
        &self.queue
    }
    fn queue_mut(&mut self) -> &mut MessageQueue {
        &mut self.queue
    }
    fn set_loading(&mut self, loading: bool) {
        self.is_loading = loading;
    }
}

impl PostListState for AccountState {
    fn posts(&self) -> &[Post] {
        &self.tabs.posts
    }
    fn posts_mut(&mut self) -> &mut [Post] {
        &mut self.tabs.posts
    }
    fn remove_post(&mut self, id: &str) -> bool {
        remove_from(&mut self.tabs.posts, id)
    }
}

impl HasTabbedPosts for AccountState {
    fn tabbed(&self) -> &TabbedPosts {
        &self.tabs
    }
    fn tabbed_mut(&mut self) -> &mut TabbedPosts {
        &mut self.tabs
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AccountEvent {
    GetAccount,
    OnChangeTab(usize),
    OnChangePostScrollPosition(u32),
    UpdateList(Post),
    RemoveItem(String),
    ToggleLike(String),
    ToggleRetweet(String),
    DeletePost(String),
    ConfirmDelete(String),
    ToggleFollow(String),
    NextPage,
    /// Ask to log out
    OnLogout,
    ConfirmLogout,
    CancelConfirmation,
    OnRemoveHeadFromQueue,
}

pub struct AccountViewModel {
    screen: Screen<AccountState, AccountEvent>,
    get_account: GetAccount,
    tabs: TabLoader,
    actions: PostActions,
    session: Arc<SessionManager>,
}

impl AccountViewModel {
    pub fn new(
        get_account: GetAccount,
        tabs: TabLoader,
        actions: PostActions,
        session: Arc<SessionManager>,
    ) -> Self {
        let screen = Screen::new(AccountState::default()).with_refresh(actions.bus());
        Self {
            screen,
            get_account,
            tabs,
            actions,
            session,
        }
    }

    pub fn screen(&self) -> &Screen<AccountState, AccountEvent> {
        &self.screen
    }

    pub fn state(&self) -> AccountState {
        self.screen.snapshot()
    }

    pub async fn on_trigger_event(&self, event: AccountEvent) -> Result<(), ScreenError> {
        let result = self.handle(event).await;
        if let Err(err) = &result {
            tracing::warn!("Account event ignored: {}", err);
        }
        result
    }

    fn username(&self) -> Result<String, ScreenError> {
        self.screen
            .read(|s| s.account.as_ref().map(|a| a.username.clone()))
            .ok_or(ScreenError::MissingAccount)
    }

    async fn handle(&self, event: AccountEvent) -> Result<(), ScreenError> {
        match event {
            AccountEvent::GetAccount => {
                let last = self
                    .screen
                    .follow(self.get_account.execute(), |s, account| s.account = Some(account))
                    .await;
                if let Some(account) = last.into_data() {
                    self.tabs.first_page(&self.screen, account.username).await;
                }
                Ok(())
            }
            AccountEvent::OnChangeTab(index) => {
                let username = self.username()?;
                self.tabs.change_tab(&self.screen, index, username).await;
                Ok(())
            }
            AccountEvent::OnChangePostScrollPosition(position) => {
                self.screen.update(|s| s.tabs.scroll_position = position);
                Ok(())
            }
            AccountEvent::NextPage => {
                let username = self.username()?;
                self.tabs.next_page(&self.screen, username).await;
                Ok(())
            }
            AccountEvent::UpdateList(post) => {
                self.on_refresh(RefreshEvent::PostUpdated(post));
                Ok(())
            }
            AccountEvent::RemoveItem(id) => {
                self.on_refresh(RefreshEvent::PostRemoved(id));
                Ok(())
            }
            AccountEvent::ToggleLike(id) => self.actions.toggle_like(&self.screen, &id).await,
            AccountEvent::ToggleRetweet(id) => self.actions.toggle_retweet(&self.screen, &id).await,
            AccountEvent::ToggleFollow(username) => self
                .actions
                .toggle_follow(&self.screen, &username)
                .await
                .map(|_| ()),
            AccountEvent::DeletePost(id) => self.actions.confirm_delete(
                &self.screen,
                &id,
                AccountEvent::ConfirmDelete(id.clone()),
                AccountEvent::CancelConfirmation,
            ),
            AccountEvent::ConfirmDelete(id) => {
                self.actions.delete(&self.screen, &id).await.map(|_| ())
            }
            AccountEvent::OnLogout => {
                if !self.session.is_logged_in() {
                    return Err(ScreenError::NotLoggedIn);
                }
                self.screen.confirm(
                    messages::CONFIRM_LOGOUT,
                    AccountEvent::ConfirmLogout,
                    AccountEvent::CancelConfirmation,
                );
                Ok(())
            }
            AccountEvent::ConfirmLogout => {
                self.session.on_trigger_event(SessionEvent::Logout).await?;
                self.screen.update(|s| {
                    s.account = None;
                    s.tabs.reset();
                });
                Ok(())
            }
            AccountEvent::CancelConfirmation => {
                self.screen.clear_queue();
                Ok(())
            }
            AccountEvent::OnRemoveHeadFromQueue => {
                self.screen.remove_head_from_queue();
                Ok(())
            }
        }
    }

    fn on_refresh(&self, event: RefreshEvent) {
        self.screen.update(|s| {
            if let RefreshEvent::AccountUpdated(account) = &event {
                s.account = Some(account.clone());
            }
            apply_refresh(s, &event);
        });
    }

    async fn dispatch(&self, input: Input<AccountEvent>) {
        match input {
            Input::Event(event) => {
                let _ = self.on_trigger_event(event).await;
            }
            Input::Refresh(event) => self.on_refresh(event),
        }
    }

    pub async fn process_pending(&self) -> usize {
        let inputs = self.screen.pending_inputs();
        let count = inputs.len();
        for input in inputs {
            self.dispatch(input).await;
        }
        count
    }

    pub async fn run(&self) {
        while let Some(input) = self.screen.next_input().await {
            self.dispatch(input).await;
        }
    }
}
