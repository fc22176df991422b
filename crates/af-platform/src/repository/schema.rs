//! Schema Bootstrap
//!
//! Creates all tables and indexes if they do not exist. Statements are
//! idempotent so the server can run this on every start.

use sqlx::PgPool;

use crate::error::Result;

const TABLES: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS profiles (
        id TEXT PRIMARY KEY,
        role TEXT NOT NULL,
        full_name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        password_hash TEXT,
        phone TEXT,
        date_of_birth DATE,
        gender TEXT,
        nationality TEXT,
        address TEXT,
        city TEXT,
        state TEXT,
        pincode TEXT,
        father_name TEXT,
        mother_name TEXT,
        emergency_contact TEXT,
        created_at TIMESTAMPTZ NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS universities (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        code TEXT NOT NULL UNIQUE,
        city TEXT NOT NULL,
        state TEXT NOT NULL,
        rank INTEGER,
        description TEXT,
        website TEXT,
        created_at TIMESTAMPTZ NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS programs (
        id TEXT PRIMARY KEY,
        university_id TEXT NOT NULL REFERENCES universities(id),
        name TEXT NOT NULL,
        degree TEXT NOT NULL,
        duration_years INTEGER NOT NULL,
        total_fees BIGINT NOT NULL,
        application_fee BIGINT NOT NULL,
        description TEXT,
        eligibility TEXT,
        created_at TIMESTAMPTZ NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS document_types (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        description TEXT,
        is_required BOOLEAN NOT NULL,
        max_size_mb INTEGER NOT NULL,
        allowed_formats TEXT[] NOT NULL,
        created_at TIMESTAMPTZ NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS program_documents (
        id TEXT PRIMARY KEY,
        program_id TEXT NOT NULL REFERENCES programs(id),
        document_type_id TEXT NOT NULL REFERENCES document_types(id),
        is_required BOOLEAN NOT NULL,
        UNIQUE (program_id, document_type_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS applications (
        id TEXT PRIMARY KEY,
        application_number TEXT NOT NULL UNIQUE,
        student_id TEXT NOT NULL REFERENCES profiles(id),
        university_id TEXT NOT NULL REFERENCES universities(id),
        program_id TEXT NOT NULL REFERENCES programs(id),
        status TEXT NOT NULL,
        application_fee BIGINT NOT NULL,
        submission_date TIMESTAMPTZ,
        tenth_school TEXT,
        tenth_board TEXT,
        tenth_year INTEGER,
        tenth_percentage DOUBLE PRECISION,
        twelfth_school TEXT,
        twelfth_board TEXT,
        twelfth_year INTEGER,
        twelfth_percentage DOUBLE PRECISION,
        graduation_college TEXT,
        graduation_university TEXT,
        graduation_degree TEXT,
        graduation_year INTEGER,
        graduation_percentage DOUBLE PRECISION,
        admin_notes TEXT,
        created_at TIMESTAMPTZ NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS application_documents (
        id TEXT PRIMARY KEY,
        application_id TEXT NOT NULL REFERENCES applications(id),
        document_type_id TEXT NOT NULL REFERENCES document_types(id),
        storage_key TEXT NOT NULL,
        file_url TEXT NOT NULL,
        file_name TEXT NOT NULL,
        file_size BIGINT NOT NULL,
        status TEXT NOT NULL,
        admin_notes TEXT,
        uploaded_at TIMESTAMPTZ NOT NULL,
        verified_at TIMESTAMPTZ
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS support_tickets (
        id TEXT PRIMARY KEY,
        ticket_number TEXT NOT NULL UNIQUE,
        student_id TEXT NOT NULL REFERENCES profiles(id),
        application_id TEXT REFERENCES applications(id),
        subject TEXT NOT NULL,
        priority TEXT NOT NULL,
        status TEXT NOT NULL,
        assigned_to TEXT REFERENCES profiles(id),
        created_at TIMESTAMPTZ NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS ticket_messages (
        id TEXT PRIMARY KEY,
        ticket_id TEXT NOT NULL REFERENCES support_tickets(id),
        sender_id TEXT NOT NULL REFERENCES profiles(id),
        message TEXT NOT NULL,
        is_internal BOOLEAN NOT NULL,
        created_at TIMESTAMPTZ NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS audit_logs (
        id TEXT PRIMARY KEY,
        action TEXT NOT NULL,
        entity_type TEXT NOT NULL,
        entity_id TEXT,
        description TEXT NOT NULL,
        actor_id TEXT,
        actor_email TEXT,
        ip_address TEXT,
        request_id TEXT,
        metadata TEXT,
        created_at TIMESTAMPTZ NOT NULL
    )
    "#,
];

const INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_programs_university ON programs(university_id)",
    "CREATE INDEX IF NOT EXISTS idx_program_documents_program ON program_documents(program_id)",
    "CREATE INDEX IF NOT EXISTS idx_applications_student ON applications(student_id)",
    "CREATE INDEX IF NOT EXISTS idx_applications_status ON applications(status)",
    "CREATE INDEX IF NOT EXISTS idx_application_documents_application ON application_documents(application_id)",
    "CREATE INDEX IF NOT EXISTS idx_tickets_student ON support_tickets(student_id)",
    "CREATE INDEX IF NOT EXISTS idx_tickets_status ON support_tickets(status)",
    "CREATE INDEX IF NOT EXISTS idx_ticket_messages_ticket ON ticket_messages(ticket_id, created_at)",
    "CREATE INDEX IF NOT EXISTS idx_audit_logs_entity ON audit_logs(entity_type, entity_id)",
];

/// Create all tables and indexes.
pub async fn init_schema(pool: &PgPool) -> Result<()> {
    for ddl in TABLES.iter().chain(INDEXES) {
        sqlx::query(ddl).execute(pool).await?;
    }
    Ok(())
}
