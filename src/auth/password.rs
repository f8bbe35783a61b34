//! bcrypt hashing, run on actix's blocking pool so a slow hash only delays
//! the request that asked for it.

use actix_web::web;

use crate::error::AppError;

pub async fn hash_password(password: String, cost: u32) -> Result<String, AppError> {
    let hash = web::block(move || bcrypt::hash(password, cost)).await??;
    Ok(hash)
}

pub async fn verify_password(password: String, hash: String) -> Result<bool, AppError> {
    let matches = web::block(move || bcrypt::verify(password, &hash)).await??;
    Ok(matches)
}
