//! Development Data Seeding
//!
//! Populates an empty database with a staff account and a small catalog so
//! the portal is usable straight after first boot. Safe to run on every
//! start; existing data is left alone.

use crate::domain::{DocumentType, Profile, Program, ProgramDocument, University, UserRole};
use crate::error::Result;
use crate::repository::{
    DocumentTypeRepository, ProfileRepository, ProgramDocumentRepository, ProgramRepository,
    UniversityRepository,
};
use crate::service::PasswordService;

pub struct DevDataSeeder {
    profiles: ProfileRepository,
    universities: UniversityRepository,
    programs: ProgramRepository,
    document_types: DocumentTypeRepository,
    program_documents: ProgramDocumentRepository,
}

impl DevDataSeeder {
    pub fn new(
        profiles: ProfileRepository,
        universities: UniversityRepository,
        programs: ProgramRepository,
        document_types: DocumentTypeRepository,
        program_documents: ProgramDocumentRepository,
    ) -> Self {
        Self {
            profiles,
            universities,
            programs,
            document_types,
            program_documents,
        }
    }

    pub async fn run(&self, admin_email: &str, admin_password: &str) -> Result<()> {
        self.seed_admin(admin_email, admin_password).await?;
        self.seed_catalog().await?;
        Ok(())
    }

    async fn seed_admin(&self, email: &str, password: &str) -> Result<()> {
        if self.profiles.find_by_email(email).await?.is_some() {
            return Ok(());
        }

        let hash = PasswordService::hash(password)?;
        let admin =
            Profile::new("Portal Admin", email, UserRole::Admin).with_password_hash(hash);
        self.profiles.insert(&admin).await?;
        tracing::info!(email, "Seeded staff account");
        Ok(())
    }

    async fn seed_catalog(&self) -> Result<()> {
        if self.universities.count().await? > 0 {
            return Ok(());
        }

        let marksheet_10 = DocumentType::new("10th Marksheet")
            .with_description("Class 10 board examination marksheet");
        let marksheet_12 = DocumentType::new("12th Marksheet")
            .with_description("Class 12 board examination marksheet");
        let id_proof = DocumentType::new("ID Proof")
            .with_formats(vec!["pdf".to_string(), "jpg".to_string(), "png".to_string()]);
        let photo = DocumentType::new("Passport Photo")
            .with_formats(vec!["jpg".to_string(), "png".to_string()])
            .with_max_size_mb(1);
        let degree_cert = DocumentType::new("Graduation Certificate")
            .with_description("Degree certificate for postgraduate applicants")
            .optional();

        for doc_type in [&marksheet_10, &marksheet_12, &id_proof, &photo, &degree_cert] {
            self.document_types.insert(doc_type).await?;
        }

        let nimbus = University::new("Nimbus Institute of Technology", "NIT", "Pune", "Maharashtra")
            .with_rank(12)
            .with_website("https://nimbus.example.edu");
        let crestwood = University::new("Crestwood University", "CWU", "Bengaluru", "Karnataka")
            .with_rank(27)
            .with_description("Multi-disciplinary university with strong research programs");
        self.universities.insert(&nimbus).await?;
        self.universities.insert(&crestwood).await?;

        let btech = Program::new(&nimbus.id, "Computer Science and Engineering", "B.Tech", 4)
            .with_fees(800_000, 1_500)
            .with_eligibility("Minimum 60% in 12th with Physics, Chemistry, Mathematics");
        let mba = Program::new(&crestwood.id, "Business Administration", "MBA", 2)
            .with_fees(1_200_000, 2_000)
            .with_eligibility("Bachelor's degree with minimum 50%");
        self.programs.insert(&btech).await?;
        self.programs.insert(&mba).await?;

        for (program, doc_types) in [
            (&btech, vec![&marksheet_10, &marksheet_12, &id_proof, &photo]),
            (&mba, vec![&marksheet_12, &degree_cert, &id_proof, &photo]),
        ] {
            for doc_type in doc_types {
                self.program_documents
                    .insert(&ProgramDocument::new(&program.id, &doc_type.id))
                    .await?;
            }
        }

        tracing::info!("Seeded demo catalog");
        Ok(())
    }
}
