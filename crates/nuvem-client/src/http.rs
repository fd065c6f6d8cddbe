//! Reqwest implementation of the transport seam.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart;
use reqwest::{Client, Response};
use tokio::sync::RwLock;
use tracing::debug;

use nuvem_core::config::ApiConfig;
use nuvem_core::types::{FileId, FolderId};
use nuvem_core::{ApiError, ApiResult, ErrorKind};
use nuvem_entity::{
    Download, File, FileLink, Folder, FolderContent, ShareGrant, SharePermission, StorageUsage,
    UploadRequest,
};
use nuvem_model::DriveTransport;

use crate::normalize::{normalize_request_error, normalize_status, RouteKinds};
use crate::wire::{
    CreateFolderBody, FileDto, FileLinkBody, FileLinkDto, FolderDto, FolderListingDto,
    RenameFileBody, RenameFolderBody, ServerErrorBody, ShareFolderBody, ShareGrantDto,
    UnshareFolderBody, VisibilityBody,
};

const USER_AGENT: &str = concat!("NuvemDrive/", env!("CARGO_PKG_VERSION"));

/// HTTP transport over the drive REST API.
///
/// Holds the bearer credential behind a lock so a re-login can swap it
/// without rebuilding the client.
pub struct HttpTransport {
    client: Client,
    base_url: String,
    token: RwLock<Option<String>>,
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl HttpTransport {
    /// Build a transport from configuration. No credential is attached yet.
    pub fn new(config: &ApiConfig) -> ApiResult<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| ApiError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: RwLock::new(None),
        })
    }

    /// Attach or replace the bearer credential.
    pub async fn set_token(&self, token: Option<String>) {
        *self.token.write().await = token;
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.token.read().await.as_ref() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Turn a non-2xx response into a typed error, parsing the server's
    /// error body when it has one.
    async fn error_from(&self, response: Response, route: RouteKinds) -> ApiError {
        let status = response.status();
        let body = response
            .json::<ServerErrorBody>()
            .await
            .unwrap_or_default();
        normalize_status(status, route, body)
    }

    async fn json_body<T: serde::de::DeserializeOwned>(
        &self,
        response: Response,
        route: RouteKinds,
    ) -> ApiResult<T> {
        if !response.status().is_success() {
            return Err(self.error_from(response, route).await);
        }
        response.json::<T>().await.map_err(|e| {
            ApiError::with_source(ErrorKind::UnknownApi, "Malformed server response", e)
        })
    }

    async fn empty_body(&self, response: Response, route: RouteKinds) -> ApiResult<()> {
        if !response.status().is_success() {
            return Err(self.error_from(response, route).await);
        }
        Ok(())
    }
}

/// Extract the filename parameter from a `Content-Disposition` header.
/// Handles both the plain `filename="x"` form and the RFC 5987
/// `filename*=UTF-8''x` form, preferring the latter.
pub(crate) fn filename_from_disposition(header: &str) -> Option<String> {
    for part in header.split(';').map(str::trim) {
        if let Some(encoded) = part.strip_prefix("filename*=UTF-8''") {
            return Some(percent_decode(encoded));
        }
    }
    for part in header.split(';').map(str::trim) {
        if let Some(value) = part.strip_prefix("filename=") {
            return Some(value.trim_matches('"').to_string());
        }
    }
    None
}

/// Minimal percent-decoding for filename*; invalid sequences pass through.
fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let Ok(byte) = u8::from_str_radix(&input[i + 1..i + 3], 16) {
                out.push(byte);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

#[async_trait]
impl DriveTransport for HttpTransport {
    async fn fetch_folder(&self, folder_id: Option<FolderId>) -> ApiResult<FolderContent> {
        let path = match folder_id {
            Some(id) => format!("/folders/{id}"),
            None => "/folders".to_string(),
        };
        debug!(path = %path, "GET folder listing");
        let response = self
            .authorize(self.client.get(self.url(&path)))
            .await
            .send()
            .await
            .map_err(normalize_request_error)?;
        let dto: FolderListingDto = self.json_body(response, RouteKinds::folder()).await?;
        Ok(dto.into())
    }

    async fn create_folder(&self, name: &str, parent_id: Option<FolderId>) -> ApiResult<Folder> {
        let response = self
            .authorize(self.client.post(self.url("/pastas/create")))
            .await
            .json(&CreateFolderBody {
                nome: name,
                pasta_pai_id: parent_id,
            })
            .send()
            .await
            .map_err(normalize_request_error)?;
        let dto: FolderDto = self
            .json_body(
                response,
                RouteKinds::folder().with_not_found(ErrorKind::ParentNotFound),
            )
            .await?;
        Ok(dto.into())
    }

    async fn rename_folder(&self, id: FolderId, new_name: &str) -> ApiResult<Folder> {
        let response = self
            .authorize(self.client.put(self.url(&format!("/pastas/{id}/rename"))))
            .await
            .json(&RenameFolderBody { nome: new_name })
            .send()
            .await
            .map_err(normalize_request_error)?;
        let dto: FolderDto = self.json_body(response, RouteKinds::folder()).await?;
        Ok(dto.into())
    }

    async fn delete_folder(&self, id: FolderId) -> ApiResult<()> {
        let response = self
            .authorize(self.client.delete(self.url(&format!("/pastas/{id}/delete"))))
            .await
            .send()
            .await
            .map_err(normalize_request_error)?;
        self.empty_body(response, RouteKinds::folder()).await
    }

    async fn share_folder(
        &self,
        id: FolderId,
        grantee_email: &str,
        permission: SharePermission,
    ) -> ApiResult<ShareGrant> {
        let response = self
            .authorize(self.client.post(self.url(&format!("/pastas/{id}/share"))))
            .await
            .json(&ShareFolderBody::new(grantee_email, permission))
            .send()
            .await
            .map_err(normalize_request_error)?;
        // A 404 here can also mean an unknown grantee; the server
        // disambiguates in the body code, the kind stays folder-centric.
        let dto: ShareGrantDto = self
            .json_body(
                response,
                RouteKinds::folder().with_bad_request(ErrorKind::InvalidEmail),
            )
            .await?;
        Ok(dto.into())
    }

    async fn unshare_folder(&self, id: FolderId, grantee_email: &str) -> ApiResult<()> {
        let response = self
            .authorize(self.client.delete(self.url(&format!("/pastas/{id}/unshare"))))
            .await
            .json(&UnshareFolderBody {
                email_usuario: grantee_email,
            })
            .send()
            .await
            .map_err(normalize_request_error)?;
        self.empty_body(
            response,
            RouteKinds::folder().with_not_found(ErrorKind::ShareNotFound),
        )
        .await
    }

    async fn list_shares(&self, id: FolderId) -> ApiResult<Vec<ShareGrant>> {
        let response = self
            .authorize(self.client.get(self.url(&format!("/pastas/{id}/shares"))))
            .await
            .send()
            .await
            .map_err(normalize_request_error)?;
        let dtos: Vec<ShareGrantDto> = self.json_body(response, RouteKinds::folder()).await?;
        Ok(dtos.into_iter().map(ShareGrant::from).collect())
    }

    async fn upload_file(&self, request: UploadRequest) -> ApiResult<File> {
        let mut part = multipart::Part::bytes(request.bytes.to_vec())
            .file_name(request.file_name.clone());
        if let Some(mime) = &request.mime_type {
            part = part.mime_str(mime).map_err(|e| {
                ApiError::with_source(ErrorKind::Serialization, "Invalid MIME type", e)
            })?;
        }

        let mut form = multipart::Form::new()
            .part("file", part)
            .text("is_public", request.is_public.to_string());
        if !request.tags.is_empty() {
            let tags = serde_json::to_string(&request.tags)?;
            form = form.text("tags", tags);
        }
        if let Some(description) = &request.description {
            form = form.text("description", description.clone());
        }
        if let Some(folder_id) = request.folder_id {
            form = form.text("folder_id", folder_id.to_string());
        }

        debug!(file_name = %request.file_name, bytes = request.bytes.len(), "POST upload");
        let response = self
            .authorize(self.client.post(self.url("/files/upload")))
            .await
            .multipart(form)
            .send()
            .await
            .map_err(normalize_request_error)?;
        let dto: FileDto = self
            .json_body(
                response,
                RouteKinds::file().with_not_found(ErrorKind::FolderNotFound),
            )
            .await?;
        Ok(dto.into())
    }

    async fn download_file(&self, id: FileId) -> ApiResult<Download> {
        let response = self
            .authorize(self.client.get(self.url(&format!("/files/{id}/download"))))
            .await
            .send()
            .await
            .map_err(normalize_request_error)?;
        if !response.status().is_success() {
            return Err(self.error_from(response, RouteKinds::file()).await);
        }
        let file_name = response
            .headers()
            .get(reqwest::header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(filename_from_disposition);
        let bytes = response.bytes().await.map_err(normalize_request_error)?;
        Ok(Download { file_name, bytes })
    }

    async fn delete_file(&self, id: FileId) -> ApiResult<()> {
        let response = self
            .authorize(self.client.delete(self.url(&format!("/files/{id}/delete"))))
            .await
            .send()
            .await
            .map_err(normalize_request_error)?;
        self.empty_body(response, RouteKinds::file()).await
    }

    async fn rename_file(
        &self,
        id: FileId,
        new_name: &str,
        keep_extension: bool,
    ) -> ApiResult<File> {
        let response = self
            .authorize(self.client.put(self.url(&format!("/files/{id}/rename"))))
            .await
            .json(&RenameFileBody {
                novo_nome: new_name,
                manter_extensao: keep_extension,
            })
            .send()
            .await
            .map_err(normalize_request_error)?;
        let dto: FileDto = self
            .json_body(
                response,
                RouteKinds::file().with_bad_request(ErrorKind::ExtensionChange),
            )
            .await?;
        Ok(dto.into())
    }

    async fn set_file_visibility(&self, id: FileId, is_public: bool) -> ApiResult<File> {
        let response = self
            .authorize(self.client.patch(self.url(&format!("/files/{id}/visibility"))))
            .await
            .json(&VisibilityBody { is_public })
            .send()
            .await
            .map_err(normalize_request_error)?;
        let dto: FileDto = self.json_body(response, RouteKinds::file()).await?;
        Ok(dto.into())
    }

    async fn create_file_link(
        &self,
        id: FileId,
        expires_in_seconds: Option<u64>,
        max_access: Option<u32>,
    ) -> ApiResult<FileLink> {
        let response = self
            .authorize(self.client.post(self.url(&format!("/files/share/{id}"))))
            .await
            .json(&FileLinkBody {
                expira_em: expires_in_seconds,
                max_acessos: max_access,
            })
            .send()
            .await
            .map_err(normalize_request_error)?;
        let dto: FileLinkDto = self.json_body(response, RouteKinds::file()).await?;
        Ok(dto.into())
    }

    async fn file_preview(&self, id: FileId) -> ApiResult<File> {
        let response = self
            .authorize(self.client.get(self.url(&format!("/files/{id}/preview"))))
            .await
            .send()
            .await
            .map_err(normalize_request_error)?;
        let dto: FileDto = self.json_body(response, RouteKinds::file()).await?;
        Ok(dto.into())
    }

    async fn storage_usage(&self) -> ApiResult<StorageUsage> {
        let response = self
            .authorize(self.client.get(self.url("/usage")))
            .await
            .send()
            .await
            .map_err(normalize_request_error)?;
        let dto: crate::wire::UsageDto = self.json_body(response, RouteKinds::folder()).await?;
        Ok(dto.into())
    }
}
