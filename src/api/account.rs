use super::{AccountResponse, AccountUpdate, ApiClient, MediaUpload};
use crate::error::ApiError;
use crate::models::Account;
use crate::traits::MultipartForm;

fn attach(form: MultipartForm, name: &str, upload: &Option<MediaUpload>) -> MultipartForm {
    match upload {
        Some(upload) => form.file(
            name,
            upload.filename.as_str(),
            upload.mime_type.as_str(),
            upload.bytes.clone(),
        ),
        None => form,
    }
}

impl ApiClient {
    /// GET accounts
    pub async fn get_current_account(&self) -> Result<Account, ApiError> {
        let response: AccountResponse = self.get("accounts").await?;
        Ok(response.into())
    }

    /// PUT accounts (multipart)
    pub async fn update_account(&self, update: &AccountUpdate) -> Result<Account, ApiError> {
        let mut form = MultipartForm::new()
            .text("email", update.email.as_str())
            .text("username", update.username.as_str())
            .text("displayName", update.display_name.as_str());
        if let Some(bio) = &update.bio {
            form = form.text("bio", bio.as_str());
        }
        form = attach(form, "image", &update.image);
        form = attach(form, "banner", &update.banner);

        let response: AccountResponse = self.put_form("accounts", form).await?;
        Ok(response.into())
    }
}
