//! Wire DTOs for the drive REST API.
//!
//! The backend speaks Portuguese field names (`nome`, `pasta_pai_id`,
//! `email_usuario`, ...). Those names are confined to this module; the
//! rest of the workspace only sees the entity types. Conversions happen
//! exactly once, at deserialization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use nuvem_core::types::{FileId, FolderId, ShareId, UserId};
use nuvem_entity::{File, FileLink, Folder, FolderContent, PathSegment, ShareGrant, SharePermission};

/// A folder as the server serializes it.
#[derive(Debug, Clone, Deserialize)]
pub struct FolderDto {
    pub id: FolderId,
    pub nome: String,
    #[serde(default)]
    pub pasta_pai_id: Option<FolderId>,
    pub dono_id: UserId,
    #[serde(default)]
    pub dono_email: Option<String>,
    #[serde(default)]
    pub compartilhada: bool,
    #[serde(default)]
    pub compartilhada_herdada: bool,
    #[serde(default)]
    pub excluida_em: Option<DateTime<Utc>>,
    pub criada_em: DateTime<Utc>,
}

impl From<FolderDto> for Folder {
    fn from(dto: FolderDto) -> Self {
        Folder {
            id: dto.id,
            name: dto.nome,
            parent_id: dto.pasta_pai_id,
            owner_id: dto.dono_id,
            owner_email: dto.dono_email,
            is_shared_direct: dto.compartilhada,
            is_shared_inherited: dto.compartilhada_herdada,
            deleted_at: dto.excluida_em,
            created_at: dto.criada_em,
        }
    }
}

/// A file as the server serializes it.
#[derive(Debug, Clone, Deserialize)]
pub struct FileDto {
    pub id: FileId,
    pub nome: String,
    #[serde(default)]
    pub pasta_id: Option<FolderId>,
    pub dono_id: UserId,
    #[serde(default)]
    pub dono_email: Option<String>,
    pub tamanho: u64,
    #[serde(default)]
    pub tipo_mime: Option<String>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub compartilhado: bool,
    pub criado_em: DateTime<Utc>,
}

impl From<FileDto> for File {
    fn from(dto: FileDto) -> Self {
        File {
            id: dto.id,
            name: dto.nome,
            folder_id: dto.pasta_id,
            owner_id: dto.dono_id,
            owner_email: dto.dono_email,
            size_bytes: dto.tamanho,
            mime_type: dto.tipo_mime,
            is_public: dto.is_public,
            is_shared_transitively: dto.compartilhado,
            created_at: dto.criado_em,
        }
    }
}

/// One breadcrumb segment; `id == null` marks the root.
#[derive(Debug, Clone, Deserialize)]
pub struct PathSegmentDto {
    #[serde(default)]
    pub id: Option<FolderId>,
    pub nome: String,
}

impl From<PathSegmentDto> for PathSegment {
    fn from(dto: PathSegmentDto) -> Self {
        PathSegment {
            id: dto.id,
            name: dto.nome,
        }
    }
}

/// Response of `GET /folders[/{id}]`.
#[derive(Debug, Clone, Deserialize)]
pub struct FolderListingDto {
    #[serde(default)]
    pub pasta_atual: Option<FolderDto>,
    #[serde(default)]
    pub pastas: Vec<FolderDto>,
    #[serde(default)]
    pub arquivos: Vec<FileDto>,
    #[serde(default)]
    pub path: Vec<PathSegmentDto>,
}

impl From<FolderListingDto> for FolderContent {
    fn from(dto: FolderListingDto) -> Self {
        FolderContent {
            folder: dto.pasta_atual.map(Folder::from),
            subfolders: dto.pastas.into_iter().map(Folder::from).collect(),
            files: dto.arquivos.into_iter().map(File::from).collect(),
            path: dto.path.into_iter().map(PathSegment::from).collect(),
        }
    }
}

/// Body of `POST /pastas/create`.
#[derive(Debug, Serialize)]
pub struct CreateFolderBody<'a> {
    pub nome: &'a str,
    pub pasta_pai_id: Option<FolderId>,
}

/// Body of `PUT /pastas/{id}/rename`.
#[derive(Debug, Serialize)]
pub struct RenameFolderBody<'a> {
    pub nome: &'a str,
}

/// Body of `POST /pastas/{id}/share`. The three legacy permission flags
/// are expanded from [`SharePermission`] here and nowhere else.
#[derive(Debug, Serialize)]
pub struct ShareFolderBody<'a> {
    pub email_usuario: &'a str,
    pub permissao_editar: bool,
    pub permissao_excluir: bool,
    pub permissao_compartilhar: bool,
}

impl<'a> ShareFolderBody<'a> {
    pub fn new(email_usuario: &'a str, permission: SharePermission) -> Self {
        let (permissao_editar, permissao_excluir, permissao_compartilhar) =
            permission.to_wire_flags();
        Self {
            email_usuario,
            permissao_editar,
            permissao_excluir,
            permissao_compartilhar,
        }
    }
}

/// Body of `DELETE /pastas/{id}/unshare`.
#[derive(Debug, Serialize)]
pub struct UnshareFolderBody<'a> {
    pub email_usuario: &'a str,
}

/// A share grant as the server serializes it.
#[derive(Debug, Clone, Deserialize)]
pub struct ShareGrantDto {
    pub id: ShareId,
    pub pasta_id: FolderId,
    pub email_usuario: String,
    #[serde(default)]
    pub permissao_editar: bool,
    #[serde(default)]
    pub permissao_excluir: bool,
    #[serde(default)]
    pub permissao_compartilhar: bool,
}

impl From<ShareGrantDto> for ShareGrant {
    fn from(dto: ShareGrantDto) -> Self {
        ShareGrant {
            id: dto.id,
            folder_id: dto.pasta_id,
            grantee_email: dto.email_usuario,
            permission: SharePermission::from_wire_flags(
                dto.permissao_editar,
                dto.permissao_excluir,
                dto.permissao_compartilhar,
            ),
        }
    }
}

/// Body of `PUT /files/{id}/rename`.
#[derive(Debug, Serialize)]
pub struct RenameFileBody<'a> {
    pub novo_nome: &'a str,
    pub manter_extensao: bool,
}

/// Body of `PATCH /files/{id}/visibility`.
#[derive(Debug, Serialize)]
pub struct VisibilityBody {
    pub is_public: bool,
}

/// Body of `POST /files/share/{id}`.
#[derive(Debug, Serialize)]
pub struct FileLinkBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expira_em: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_acessos: Option<u32>,
}

/// Response of `POST /files/share/{id}`. This endpoint already answers in
/// English field names, unlike the folder routes.
#[derive(Debug, Clone, Deserialize)]
pub struct FileLinkDto {
    pub share_url: String,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub max_access: Option<u32>,
}

impl From<FileLinkDto> for FileLink {
    fn from(dto: FileLinkDto) -> Self {
        FileLink {
            share_url: dto.share_url,
            expires_at: dto.expires_at,
            max_access: dto.max_access,
        }
    }
}

/// Response of `GET /usage`.
#[derive(Debug, Clone, Deserialize)]
pub struct UsageDto {
    pub used: u64,
    /// Zero or absent means the server does not know the quota; the
    /// tracker substitutes its last known or configured value.
    #[serde(default)]
    pub quota: u64,
}

impl From<UsageDto> for nuvem_entity::StorageUsage {
    fn from(dto: UsageDto) -> Self {
        nuvem_entity::StorageUsage {
            used_bytes: dto.used,
            quota_bytes: dto.quota,
        }
    }
}

/// Error body the server attaches to non-2xx responses. Every field is
/// optional; the normalizer falls back to per-kind defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub details: Option<serde_json::Value>,
}
