//! PostgreSQL persistence for documents and their sections.
//!
//! Create and edit each run in one transaction: the document row, the
//! personal detail and every submitted section commit together or not at all.
//! Section rows are replaced wholesale and renumbered in submission order.

use sqlx::{PgConnection, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::document::validation::{SectionRows, ValidatedDocument};
use crate::document::view::DocumentAggregate;
use crate::models::document::{
    Award, DocumentRow, Education, Experience, PersonalDetail, Publication, Research, SectionKind,
    Skill,
};

/// Inserts a new document with everything it carries. Returns the new id.
pub async fn create_document(
    pool: &PgPool,
    owner_id: Uuid,
    doc: &ValidatedDocument,
) -> Result<Uuid, sqlx::Error> {
    let document_id = Uuid::new_v4();
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO documents (id, owner_id, doc_type, title, template_name)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(document_id)
    .bind(owner_id)
    .bind(doc.doc_type.as_str())
    .bind(&doc.title)
    .bind(&doc.template_name)
    .execute(&mut *tx)
    .await?;

    upsert_personal(&mut tx, document_id, &doc.personal).await?;
    replace_sections(&mut tx, document_id, &doc.sections).await?;

    tx.commit().await?;
    info!("Created {} {document_id} for owner {owner_id}", doc.doc_type.as_str());
    Ok(document_id)
}

/// Applies an edit. Returns `false` when the document does not exist or
/// belongs to someone else; nothing is written in that case.
pub async fn update_document(
    pool: &PgPool,
    document_id: Uuid,
    owner_id: Uuid,
    doc: &ValidatedDocument,
) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let updated: Option<Uuid> = sqlx::query_scalar(
        r#"
        UPDATE documents
        SET doc_type = $3, title = $4, template_name = $5, updated_at = NOW()
        WHERE id = $1 AND owner_id = $2
        RETURNING id
        "#,
    )
    .bind(document_id)
    .bind(owner_id)
    .bind(doc.doc_type.as_str())
    .bind(&doc.title)
    .bind(&doc.template_name)
    .fetch_optional(&mut *tx)
    .await?;

    if updated.is_none() {
        // dropping the transaction rolls it back
        return Ok(false);
    }

    upsert_personal(&mut tx, document_id, &doc.personal).await?;
    replace_sections(&mut tx, document_id, &doc.sections).await?;

    tx.commit().await?;
    info!("Updated document {document_id} for owner {owner_id}");
    Ok(true)
}

/// Deletes a document; child rows go with it through `ON DELETE CASCADE`.
pub async fn delete_document(
    pool: &PgPool,
    document_id: Uuid,
    owner_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM documents WHERE id = $1 AND owner_id = $2")
        .bind(document_id)
        .bind(owner_id)
        .execute(pool)
        .await?;
    let deleted = result.rows_affected() > 0;
    if deleted {
        info!("Deleted document {document_id} for owner {owner_id}");
    }
    Ok(deleted)
}

/// Owner's documents, newest first.
pub async fn list_documents(pool: &PgPool, owner_id: Uuid) -> Result<Vec<DocumentRow>, sqlx::Error> {
    sqlx::query_as::<_, DocumentRow>(
        "SELECT * FROM documents WHERE owner_id = $1 ORDER BY created_at DESC",
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await
}

/// The document row alone, scoped to its owner.
pub async fn find_document(
    pool: &PgPool,
    document_id: Uuid,
    owner_id: Uuid,
) -> Result<Option<DocumentRow>, sqlx::Error> {
    sqlx::query_as::<_, DocumentRow>("SELECT * FROM documents WHERE id = $1 AND owner_id = $2")
        .bind(document_id)
        .bind(owner_id)
        .fetch_optional(pool)
        .await
}

/// Loads the full aggregate, sections in stored order.
pub async fn load_document(
    pool: &PgPool,
    document_id: Uuid,
    owner_id: Uuid,
) -> Result<Option<DocumentAggregate>, sqlx::Error> {
    let Some(document) = find_document(pool, document_id, owner_id).await? else {
        return Ok(None);
    };

    let personal_detail = sqlx::query_as::<_, PersonalDetail>(
        r#"
        SELECT image, full_name, email, phone, address, linkedin_url, portfolio_url, summary
        FROM personal_details
        WHERE document_id = $1
        "#,
    )
    .bind(document_id)
    .fetch_optional(pool)
    .await?;

    let education = sqlx::query_as::<_, Education>(
        r#"
        SELECT institution, degree, start_date, end_date, is_current, description
        FROM education WHERE document_id = $1 ORDER BY sort_order
        "#,
    )
    .bind(document_id)
    .fetch_all(pool)
    .await?;

    let experience = sqlx::query_as::<_, Experience>(
        r#"
        SELECT company, position, start_date, end_date, is_current, description
        FROM experience WHERE document_id = $1 ORDER BY sort_order
        "#,
    )
    .bind(document_id)
    .fetch_all(pool)
    .await?;

    let skills = sqlx::query_as::<_, Skill>(
        "SELECT name, proficiency FROM skills WHERE document_id = $1 ORDER BY sort_order",
    )
    .bind(document_id)
    .fetch_all(pool)
    .await?;

    let research = sqlx::query_as::<_, Research>(
        "SELECT title, description, date FROM research WHERE document_id = $1 ORDER BY sort_order",
    )
    .bind(document_id)
    .fetch_all(pool)
    .await?;

    let publications = sqlx::query_as::<_, Publication>(
        r#"
        SELECT title, publisher, date, url
        FROM publications WHERE document_id = $1 ORDER BY sort_order
        "#,
    )
    .bind(document_id)
    .fetch_all(pool)
    .await?;

    let awards = sqlx::query_as::<_, Award>(
        "SELECT title, issuer, date FROM awards WHERE document_id = $1 ORDER BY sort_order",
    )
    .bind(document_id)
    .fetch_all(pool)
    .await?;

    let mut aggregate = DocumentAggregate::new(document);
    aggregate.personal_detail = personal_detail;
    aggregate.education = education;
    aggregate.experience = experience;
    aggregate.skills = skills;
    aggregate.research = research;
    aggregate.publications = publications;
    aggregate.awards = awards;
    Ok(Some(aggregate))
}

// ────────────────────────────────────────────────────────────────────────────
// Transaction steps
// ────────────────────────────────────────────────────────────────────────────

async fn upsert_personal(
    conn: &mut PgConnection,
    document_id: Uuid,
    personal: &PersonalDetail,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO personal_details
            (document_id, image, full_name, email, phone, address,
             linkedin_url, portfolio_url, summary)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        ON CONFLICT (document_id) DO UPDATE SET
            image = EXCLUDED.image,
            full_name = EXCLUDED.full_name,
            email = EXCLUDED.email,
            phone = EXCLUDED.phone,
            address = EXCLUDED.address,
            linkedin_url = EXCLUDED.linkedin_url,
            portfolio_url = EXCLUDED.portfolio_url,
            summary = EXCLUDED.summary
        "#,
    )
    .bind(document_id)
    .bind(&personal.image)
    .bind(&personal.full_name)
    .bind(&personal.email)
    .bind(&personal.phone)
    .bind(&personal.address)
    .bind(&personal.linkedin_url)
    .bind(&personal.portfolio_url)
    .bind(&personal.summary)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

async fn clear_section(
    conn: &mut PgConnection,
    document_id: Uuid,
    kind: SectionKind,
) -> Result<(), sqlx::Error> {
    // table names come from the closed SectionKind enum
    let sql = format!("DELETE FROM {} WHERE document_id = $1", kind.table());
    sqlx::query(&sql)
        .bind(document_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Replaces each submitted section; `None` sections are left as stored.
async fn replace_sections(
    conn: &mut PgConnection,
    document_id: Uuid,
    sections: &SectionRows,
) -> Result<(), sqlx::Error> {
    if let Some(rows) = &sections.education {
        clear_section(conn, document_id, SectionKind::Education).await?;
        for (order, row) in rows.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO education
                    (document_id, sort_order, institution, degree, start_date, end_date,
                     is_current, description)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(document_id)
            .bind(order as i32)
            .bind(&row.institution)
            .bind(&row.degree)
            .bind(row.start_date)
            .bind(row.end_date)
            .bind(row.is_current)
            .bind(&row.description)
            .execute(&mut *conn)
            .await?;
        }
    }

    if let Some(rows) = &sections.experience {
        clear_section(conn, document_id, SectionKind::Experience).await?;
        for (order, row) in rows.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO experience
                    (document_id, sort_order, company, position, start_date, end_date,
                     is_current, description)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(document_id)
            .bind(order as i32)
            .bind(&row.company)
            .bind(&row.position)
            .bind(row.start_date)
            .bind(row.end_date)
            .bind(row.is_current)
            .bind(&row.description)
            .execute(&mut *conn)
            .await?;
        }
    }

    if let Some(rows) = &sections.skills {
        clear_section(conn, document_id, SectionKind::Skill).await?;
        for (order, row) in rows.iter().enumerate() {
            sqlx::query(
                "INSERT INTO skills (document_id, sort_order, name, proficiency) VALUES ($1, $2, $3, $4)",
            )
            .bind(document_id)
            .bind(order as i32)
            .bind(&row.name)
            .bind(row.proficiency)
            .execute(&mut *conn)
            .await?;
        }
    }

    if let Some(rows) = &sections.research {
        clear_section(conn, document_id, SectionKind::Research).await?;
        for (order, row) in rows.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO research (document_id, sort_order, title, description, date)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(document_id)
            .bind(order as i32)
            .bind(&row.title)
            .bind(&row.description)
            .bind(row.date)
            .execute(&mut *conn)
            .await?;
        }
    }

    if let Some(rows) = &sections.publications {
        clear_section(conn, document_id, SectionKind::Publication).await?;
        for (order, row) in rows.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO publications (document_id, sort_order, title, publisher, date, url)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(document_id)
            .bind(order as i32)
            .bind(&row.title)
            .bind(&row.publisher)
            .bind(row.date)
            .bind(&row.url)
            .execute(&mut *conn)
            .await?;
        }
    }

    if let Some(rows) = &sections.awards {
        clear_section(conn, document_id, SectionKind::Award).await?;
        for (order, row) in rows.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO awards (document_id, sort_order, title, issuer, date)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(document_id)
            .bind(order as i32)
            .bind(&row.title)
            .bind(&row.issuer)
            .bind(row.date)
            .execute(&mut *conn)
            .await?;
        }
    }

    Ok(())
}
