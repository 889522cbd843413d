//! Edit-profile form.

use super::refresh::{RefreshBus, RefreshEvent};
use super::screen::{Screen, ScreenState};
use crate::api::{AccountUpdate, MediaUpload};
use crate::domain::validation::{
    first_error, validate_bio, validate_display_name, validate_email, validate_username,
};
use crate::domain::{MessageQueue, StateMessage};
use crate::error::ScreenError;
use crate::interactors::{GetAccountFromCache, UpdateAccount};
use crate::models::Account;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateAccountState {
    pub is_loading: bool,
    pub account: Option<Account>,
    pub email: String,
    pub username: String,
    pub display_name: String,
    pub bio: String,
    pub image: Option<MediaUpload>,
    pub banner: Option<MediaUpload>,
    /// The form differs from what was last saved
    pub is_dirty: bool,
    pub on_load: bool,
    pub queue: MessageQueue,
}

impl UpdateAccountState {
    fn fill_from(&mut self, account: Account) {
        self.email = account.email.clone();
        self.username = account.username.clone();
        self.display_name = account.display_name.clone();
        self.bio = account.bio.clone().unwrap_or_default();
        self.account = Some(account);
    }

    fn validate(&self) -> Result<(), String> {
        first_error([
            validate_email(&self.email),
            validate_username(&self.username),
            validate_display_name(&self.display_name),
            validate_bio(&self.bio),
        ])
    }

    fn to_update(&self) -> AccountUpdate {
        AccountUpdate {
            email: self.email.trim().to_string(),
            username: self.username.trim().to_string(),
            display_name: self.display_name.trim().to_string(),
            bio: Some(self.bio.trim().to_string()).filter(|b| !b.is_empty()),
            image: self.image.clone(),
            banner: self.banner.clone(),
        }
    }
}

impl ScreenState for UpdateAccountState {
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

#[derive(Debug, Clone, PartialEq)]
pub enum UpdateAccountEvent {
    GetAccountFromCache(String),
    OnUpdateEmail(String),
    OnUpdateUsername(String),
    OnUpdateDisplayName(String),
    OnUpdateBio(String),
    OnUpdateImage(MediaUpload),
    OnUpdateBanner(MediaUpload),
    SetIsDirty,
    ToggleOnLoad,
    UpdatePressed,
    OnMessageReceived(StateMessage),
    OnRemoveHeadFromQueue,
}

pub struct UpdateAccountViewModel {
    screen: Screen<UpdateAccountState, UpdateAccountEvent>,
    get_account: GetAccountFromCache,
    update_account: UpdateAccount,
    bus: RefreshBus,
}

impl UpdateAccountViewModel {
    pub fn new(get_account: GetAccountFromCache, update_account: UpdateAccount, bus: RefreshBus) -> Self {
        Self {
            screen: Screen::new(UpdateAccountState::default()),
            get_account,
            update_account,
            bus,
        }
    }

    pub fn screen(&self) -> &Screen<UpdateAccountState, UpdateAccountEvent> {
        &self.screen
    }

    pub fn state(&self) -> UpdateAccountState {
        self.screen.snapshot()
    }

    fn edit(&self, f: impl FnOnce(&mut UpdateAccountState)) {
        self.screen.update(|s| {
            f(s);
            s.is_dirty = true;
        });
    }

    pub async fn on_trigger_event(&self, event: UpdateAccountEvent) -> Result<(), ScreenError> {
        match event {
            UpdateAccountEvent::GetAccountFromCache(id) => {
                let stream = self.get_account.execute(id);
                self.screen.follow(stream, |s, account| s.fill_from(account)).await;
            }
            UpdateAccountEvent::OnUpdateEmail(email) => self.edit(|s| s.email = email),
            UpdateAccountEvent::OnUpdateUsername(username) => self.edit(|s| s.username = username),
            UpdateAccountEvent::OnUpdateDisplayName(name) => self.edit(|s| s.display_name = name),
            UpdateAccountEvent::OnUpdateBio(bio) => self.edit(|s| s.bio = bio),
            UpdateAccountEvent::OnUpdateImage(image) => self.edit(|s| s.image = Some(image)),
            UpdateAccountEvent::OnUpdateBanner(banner) => self.edit(|s| s.banner = Some(banner)),
            UpdateAccountEvent::SetIsDirty => self.edit(|_| {}),
            UpdateAccountEvent::ToggleOnLoad => self.screen.update(|s| s.on_load = true),
            UpdateAccountEvent::UpdatePressed => return self.save().await,
            UpdateAccountEvent::OnMessageReceived(message) => self.screen.push_message(message),
            UpdateAccountEvent::OnRemoveHeadFromQueue => self.screen.remove_head_from_queue(),
        }
        Ok(())
    }

    async fn save(&self) -> Result<(), ScreenError> {
        let form = self.screen.snapshot();
        if let Err(message) = form.validate() {
            tracing::debug!("Account form rejected: {}", message);
            self.screen.push_message(StateMessage::error_dialog(message.clone()));
            return Err(ScreenError::Validation(message));
        }

        self.screen.update(|s| s.is_dirty = false);
        let last = self
            .screen
            .follow(self.update_account.execute(form.to_update()), |s, account| {
                s.fill_from(account);
                s.image = None;
                s.banner = None;
            })
            .await;
        match last.into_data() {
            Some(account) => {
                self.bus.publish(RefreshEvent::AccountUpdated(account));
            }
            None => self.screen.update(|s| s.is_dirty = true),
        }
        Ok(())
    }
}
