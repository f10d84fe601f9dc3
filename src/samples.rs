// Built-in datasets mirroring the portal's demo catalogs
//
// Each call returns a fresh vector; nothing here is shared between sessions.

use crate::models::{
    Client, ClientStatus, ClientType, Document, DocumentCategory, DocumentStatus, Priority, Service,
    ServiceCategory, Task, TaskStatus,
};
use chrono::NaiveDate;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

#[allow(clippy::too_many_arguments)]
fn service(
    id: &str,
    name: &str,
    description: &str,
    category: ServiceCategory,
    price: f64,
    rating: f64,
    provider: &str,
    featured: bool,
) -> Service {
    Service {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        category,
        price,
        rating,
        provider: provider.to_string(),
        featured,
    }
}

pub fn services() -> Vec<Service> {
    vec![
        service(
            "1",
            "Declaración de la Renta",
            "Preparación y presentación del IRPF anual",
            ServiceCategory::Declaraciones,
            49.0,
            4.8,
            "Gestoría Ibérica",
            true,
        ),
        service(
            "2",
            "Declaración trimestral de IVA",
            "Modelo 303 y resumen anual 390",
            ServiceCategory::Declaraciones,
            35.0,
            4.6,
            "Gestoría Ibérica",
            false,
        ),
        service(
            "3",
            "Contabilidad para autónomos",
            "Libros de ingresos y gastos, amortizaciones",
            ServiceCategory::Contabilidad,
            60.0,
            4.7,
            "Cuentas Claras",
            true,
        ),
        service(
            "4",
            "Contabilidad para sociedades",
            "Contabilidad completa y cuentas anuales",
            ServiceCategory::Contabilidad,
            150.0,
            4.5,
            "Cuentas Claras",
            false,
        ),
        service(
            "5",
            "Gestión de nóminas",
            "Nóminas, seguros sociales y contratos",
            ServiceCategory::Laboral,
            25.0,
            4.4,
            "Laboral Express",
            false,
        ),
        service(
            "6",
            "Constitución de sociedad limitada",
            "Estatutos, escritura y alta censal",
            ServiceCategory::Sociedades,
            299.0,
            4.9,
            "Mercantil Norte",
            true,
        ),
        service(
            "7",
            "Impuesto de Sociedades",
            "Modelo 200 y pagos fraccionados",
            ServiceCategory::Sociedades,
            180.0,
            4.6,
            "Mercantil Norte",
            false,
        ),
        service(
            "8",
            "Consulta fiscal personalizada",
            "Sesión de una hora con un asesor fiscal",
            ServiceCategory::Asesoria,
            75.0,
            4.9,
            "Asesores Unidos",
            false,
        ),
    ]
}

fn document(
    id: &str,
    name: &str,
    category: DocumentCategory,
    status: DocumentStatus,
    client_name: &str,
    uploaded_at: NaiveDate,
    size_kb: i64,
) -> Document {
    Document {
        id: id.to_string(),
        name: name.to_string(),
        category,
        status,
        client_name: client_name.to_string(),
        uploaded_at,
        size_kb,
    }
}

pub fn documents() -> Vec<Document> {
    vec![
        document(
            "1",
            "Modelo 100 - Renta 2023",
            DocumentCategory::Irpf,
            DocumentStatus::Pending,
            "Ana Martín Sánchez",
            date(2024, 4, 15),
            245,
        ),
        document(
            "2",
            "Modelo 303 - 1T 2024",
            DocumentCategory::Iva,
            DocumentStatus::Reviewed,
            "Carlos Rodríguez López",
            date(2024, 4, 10),
            120,
        ),
        document(
            "3",
            "Cuentas anuales 2023",
            DocumentCategory::Sociedades,
            DocumentStatus::Processed,
            "Talleres Ruiz S.L.",
            date(2024, 3, 28),
            890,
        ),
        document(
            "4",
            "Nóminas marzo 2024",
            DocumentCategory::Nominas,
            DocumentStatus::Pending,
            "Talleres Ruiz S.L.",
            date(2024, 4, 2),
            310,
        ),
        document(
            "5",
            "Certificado de retenciones",
            DocumentCategory::Irpf,
            DocumentStatus::Reviewed,
            "Laura Fernández Gil",
            date(2024, 3, 20),
            85,
        ),
        document(
            "6",
            "Facturas de proveedores",
            DocumentCategory::Otros,
            DocumentStatus::Processed,
            "Carlos Rodríguez López",
            date(2024, 3, 15),
            1540,
        ),
    ]
}

fn client(
    id: &str,
    name: &str,
    email: &str,
    status: ClientStatus,
    client_type: ClientType,
    pending_documents: i64,
    monthly_fee: f64,
) -> Client {
    Client {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        status,
        client_type,
        pending_documents,
        monthly_fee,
    }
}

pub fn clients() -> Vec<Client> {
    vec![
        client(
            "1",
            "Ana Martín Sánchez",
            "ana.martin@correo.es",
            ClientStatus::Active,
            ClientType::Autonomo,
            2,
            60.0,
        ),
        client(
            "2",
            "Carlos Rodríguez López",
            "carlos.rodriguez@correo.es",
            ClientStatus::Active,
            ClientType::Particular,
            0,
            35.0,
        ),
        client(
            "3",
            "Talleres Ruiz S.L.",
            "admin@talleresruiz.es",
            ClientStatus::Active,
            ClientType::Empresa,
            3,
            150.0,
        ),
        client(
            "4",
            "Laura Fernández Gil",
            "laura.fernandez@correo.es",
            ClientStatus::Pending,
            ClientType::Autonomo,
            1,
            60.0,
        ),
        client(
            "5",
            "Javier Moreno Ruiz",
            "javier.moreno@correo.es",
            ClientStatus::Inactive,
            ClientType::Particular,
            0,
            0.0,
        ),
    ]
}

fn task(
    id: &str,
    title: &str,
    client_name: &str,
    priority: Priority,
    status: TaskStatus,
    due_date: NaiveDate,
) -> Task {
    Task {
        id: id.to_string(),
        title: title.to_string(),
        client_name: client_name.to_string(),
        priority,
        status,
        due_date,
    }
}

pub fn tasks() -> Vec<Task> {
    vec![
        task(
            "1",
            "Revisar declaración de la renta",
            "Ana Martín Sánchez",
            Priority::High,
            TaskStatus::Pending,
            date(2024, 5, 10),
        ),
        task(
            "2",
            "Presentar modelo 303",
            "Carlos Rodríguez López",
            Priority::Urgent,
            TaskStatus::InProgress,
            date(2024, 4, 20),
        ),
        task(
            "3",
            "Cerrar contabilidad trimestral",
            "Talleres Ruiz S.L.",
            Priority::Medium,
            TaskStatus::Pending,
            date(2024, 4, 30),
        ),
        task(
            "4",
            "Solicitar certificado de retenciones",
            "Laura Fernández Gil",
            Priority::Low,
            TaskStatus::Completed,
            date(2024, 4, 5),
        ),
        task(
            "5",
            "Preparar nóminas de abril",
            "Talleres Ruiz S.L.",
            Priority::High,
            TaskStatus::Pending,
            date(2024, 4, 28),
        ),
        task(
            "6",
            "Llamar para documentación pendiente",
            "Laura Fernández Gil",
            Priority::Medium,
            TaskStatus::InProgress,
            date(2024, 4, 30),
        ),
    ]
}
